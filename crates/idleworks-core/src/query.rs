//! Read-only query API for inspecting simulation state.
//!
//! Snapshot types are owned copies with no references into engine storage,
//! suitable for handing to a display layer.

use std::fmt;

use crate::factory::Level;
use crate::fixed::{Fixed64, Minutes, fixed64_to_f64};
use crate::id::{FactoryId, MaterialId};

// ---------------------------------------------------------------------------
// Factory snapshot
// ---------------------------------------------------------------------------

/// A read-only view of a single factory.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FactorySnapshot {
    pub id: FactoryId,
    pub material: MaterialId,
    pub production_level: Level,
    pub capacity_level: Level,
    /// Effective units per minute.
    pub rate: Fixed64,
    /// Effective storage ceiling.
    pub capacity: Fixed64,
    pub accumulated: Fixed64,
    pub total_collected: Fixed64,
}

// ---------------------------------------------------------------------------
// Status snapshot
// ---------------------------------------------------------------------------

/// Collected total for one material.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MaterialTotal {
    pub material: MaterialId,
    pub name: String,
    pub collected: Fixed64,
    pub required: Option<Fixed64>,
}

/// Run-level summary: elapsed time, factory count, totals, queue length.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StatusSnapshot {
    pub elapsed: Minutes,
    pub factory_count: usize,
    pub collected: Vec<MaterialTotal>,
    pub queue_len: usize,
}

impl fmt::Display for StatusSnapshot {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Time Elapsed: {} minutes", self.elapsed)?;
        writeln!(f, "Factories: {}", self.factory_count)?;
        write!(f, "Materials Collected: {{")?;
        for (i, total) in self.collected.iter().enumerate() {
            if i > 0 {
                write!(f, ", ")?;
            }
            write!(f, "{}: {:.3}", total.name, fixed64_to_f64(total.collected))?;
        }
        writeln!(f, "}}")?;
        write!(f, "Actions in Queue: {}", self.queue_len)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn status_renders_four_lines() {
        let status = StatusSnapshot {
            elapsed: 1000,
            factory_count: 2,
            collected: vec![
                MaterialTotal {
                    material: MaterialId(0),
                    name: "wheat".into(),
                    collected: Fixed64::from_num(70.5),
                    required: Some(Fixed64::from_num(75700)),
                },
                MaterialTotal {
                    material: MaterialId(1),
                    name: "fruit".into(),
                    collected: Fixed64::ZERO,
                    required: None,
                },
            ],
            queue_len: 0,
        };

        let text = status.to_string();
        let lines: Vec<_> = text.lines().collect();
        assert_eq!(
            lines,
            vec![
                "Time Elapsed: 1000 minutes",
                "Factories: 2",
                "Materials Collected: {wheat: 70.500, fruit: 0.000}",
                "Actions in Queue: 0",
            ]
        );
    }
}
