use driftspace_common::{MatterKind, MatterSubkind};

use crate::galaxy::GalaxyGenerator;
use crate::generator::{MatterError, MatterGenerator};
use crate::giant::GiantGenerator;
use crate::nebula::NebulaGenerator;
use crate::singularity::SingularityGenerator;
use crate::starfield::StarfieldGenerator;

/// Stateless mapping from a matter tag to a constructed generator.
///
/// The factory holds nothing; the library, configuration, and arena are
/// passed to the generator per call through [`crate::GenerateCtx`].
pub struct MatterFactory;

impl MatterFactory {
    /// One branch per supported pairing. An unsupported pairing is a
    /// contract violation, never silently ignored.
    pub fn create(
        kind: MatterKind,
        subkind: MatterSubkind,
    ) -> Result<Box<dyn MatterGenerator>, MatterError> {
        match (kind, subkind) {
            (MatterKind::Starfield, MatterSubkind::Globular | MatterSubkind::Open) => {
                Ok(Box::new(StarfieldGenerator::new(subkind)))
            }
            (MatterKind::Nebula, MatterSubkind::Emission | MatterSubkind::Remnant) => {
                Ok(Box::new(NebulaGenerator::new(subkind)))
            }
            (MatterKind::Galaxy, MatterSubkind::Spiral) => {
                Ok(Box::new(GalaxyGenerator::new(subkind)))
            }
            (MatterKind::Giant, MatterSubkind::Blue | MatterSubkind::Red) => {
                Ok(Box::new(GiantGenerator::new(subkind)))
            }
            (MatterKind::Singularity, MatterSubkind::Blackhole) => {
                Ok(Box::new(SingularityGenerator::new(subkind)))
            }
            _ => Err(MatterError::UnsupportedMatter { kind, subkind }),
        }
    }
}
