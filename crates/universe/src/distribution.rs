use rand::{Rng, RngCore};
use serde::{Deserialize, Serialize};

use driftspace_common::{MatterKind, MatterSubkind};

/// One entry of the weighted spawn table.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SpawnEntry {
    /// Relative weight. The table normalises at sampling time, so weights
    /// need not sum to 100.
    pub chances: u32,
    pub kind: MatterKind,
    pub subkind: MatterSubkind,
}

impl SpawnEntry {
    pub const fn new(chances: u32, kind: MatterKind, subkind: MatterSubkind) -> Self {
        Self {
            chances,
            kind,
            subkind,
        }
    }
}

/// Weighted discrete distribution deciding which matter spawns in a cluster.
///
/// Rewritten wholesale by universe activation; read-only everywhere else.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SpawnTable {
    entries: Vec<SpawnEntry>,
}

impl SpawnTable {
    /// Build a table from entries. Zero-weight entries are kept but can never
    /// be drawn.
    pub fn new(entries: Vec<SpawnEntry>) -> Self {
        debug_assert!(!entries.is_empty(), "spawn table must not be empty");
        Self { entries }
    }

    pub fn entries(&self) -> &[SpawnEntry] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Sum of all weights.
    pub fn total_weight(&self) -> u32 {
        self.entries.iter().map(|e| e.chances).sum()
    }

    /// Weighted draw, normalising at sampling time.
    pub fn sample(&self, rng: &mut dyn RngCore) -> Option<SpawnEntry> {
        let total = self.total_weight();
        if total == 0 {
            return None;
        }
        let mut roll = rng.gen_range(0..total);
        for entry in &self.entries {
            if roll < entry.chances {
                return Some(*entry);
            }
            roll -= entry.chances;
        }
        None
    }
}

impl Default for SpawnTable {
    /// The stable universe's distribution.
    fn default() -> Self {
        Self::new(vec![
            SpawnEntry::new(30, MatterKind::Starfield, MatterSubkind::Globular),
            SpawnEntry::new(25, MatterKind::Starfield, MatterSubkind::Open),
            SpawnEntry::new(20, MatterKind::Nebula, MatterSubkind::Emission),
            SpawnEntry::new(10, MatterKind::Nebula, MatterSubkind::Remnant),
            SpawnEntry::new(8, MatterKind::Galaxy, MatterSubkind::Spiral),
            SpawnEntry::new(4, MatterKind::Giant, MatterSubkind::Blue),
            SpawnEntry::new(3, MatterKind::Singularity, MatterSubkind::Blackhole),
        ])
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand::rngs::StdRng;
    use std::collections::HashMap;

    #[test]
    fn default_table_is_nonempty() {
        let table = SpawnTable::default();
        assert!(!table.is_empty());
        assert_eq!(table.total_weight(), 100);
    }

    #[test]
    fn sample_always_returns_an_entry() {
        let table = SpawnTable::default();
        let mut rng = StdRng::seed_from_u64(11);
        for _ in 0..1000 {
            assert!(table.sample(&mut rng).is_some());
        }
    }

    #[test]
    fn sampling_converges_to_weights() {
        // Weights do not sum to 100 on purpose; normalisation happens at
        // sampling time.
        let table = SpawnTable::new(vec![
            SpawnEntry::new(60, MatterKind::Starfield, MatterSubkind::Open),
            SpawnEntry::new(30, MatterKind::Nebula, MatterSubkind::Emission),
            SpawnEntry::new(10, MatterKind::Singularity, MatterSubkind::Blackhole),
            SpawnEntry::new(20, MatterKind::Galaxy, MatterSubkind::Spiral),
        ]);
        let total = table.total_weight() as f64;

        let mut rng = StdRng::seed_from_u64(42);
        let draws = 120_000;
        let mut counts: HashMap<MatterKind, usize> = HashMap::new();
        for _ in 0..draws {
            let entry = table.sample(&mut rng).unwrap();
            *counts.entry(entry.kind).or_default() += 1;
        }

        for entry in table.entries() {
            let observed = counts[&entry.kind] as f64 / draws as f64;
            let expected = entry.chances as f64 / total;
            assert!(
                (observed - expected).abs() < 0.01,
                "{:?}: observed {observed:.4}, expected {expected:.4}",
                entry.kind
            );
        }
    }

    #[test]
    fn zero_weight_entry_is_never_drawn() {
        let table = SpawnTable::new(vec![
            SpawnEntry::new(10, MatterKind::Starfield, MatterSubkind::Open),
            SpawnEntry::new(0, MatterKind::Giant, MatterSubkind::Red),
        ]);
        let mut rng = StdRng::seed_from_u64(5);
        for _ in 0..500 {
            let entry = table.sample(&mut rng).unwrap();
            assert_ne!(entry.kind, MatterKind::Giant);
        }
    }

    #[test]
    fn all_zero_weights_yield_no_draw() {
        let table = SpawnTable::new(vec![SpawnEntry::new(
            0,
            MatterKind::Starfield,
            MatterSubkind::Open,
        )]);
        let mut rng = StdRng::seed_from_u64(5);
        assert!(table.sample(&mut rng).is_none());
    }
}
