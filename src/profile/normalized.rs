//! Normalized representation: samples reference a shared stack table.
//!
//! Stacks form a tree through parent back-references only - there are no
//! child links, and referencing a parent implies no ownership. A stack
//! entry's parent index is always strictly smaller than its own index, so
//! the table is topologically ordered and acyclic by construction.

use super::denormalized::{self, DenormalizedProfile};
use super::columnar::{ColumnarProfile, FrameTable, SampleTable, StackTable};
use super::{Stack, StackFrame};

/// One profiler observation referencing the shared stack table.
#[derive(Debug, Clone, Copy)]
pub struct Sample {
    pub time: f64,
    pub stack_index: u32,
    pub weight: f64,
}

/// One stack-table entry: a frame plus a parent back-reference.
///
/// `parent` is `None` for root entries and otherwise points at a strictly
/// smaller table index.
#[derive(Debug, Clone, Copy)]
pub struct StackNode {
    pub parent: Option<u32>,
    pub frame_index: u32,
}

/// A named call-site referencing the category table by index.
#[derive(Debug, Clone)]
pub struct Frame {
    pub name: String,
    pub category_index: u32,
}

/// Index-normalized profile: samples, stack table, frame table, and the
/// category names referenced by index everywhere else.
///
/// Samples must be sorted ascending by time.
#[derive(Debug, Clone, Default)]
pub struct NormalizedProfile {
    pub samples: Vec<Sample>,
    pub stacks: Vec<StackNode>,
    pub frames: Vec<Frame>,
    pub categories: Vec<String>,
}

impl NormalizedProfile {
    /// Materialize the leaf-to-root frame sequence for a stack-table entry.
    ///
    /// Walks the parent back-references; the returned stack starts at the
    /// given (leaf) entry and ends at its root.
    pub fn resolve_stack(&self, stack_index: u32) -> Stack {
        let mut stack = Stack::new();
        let mut current = Some(stack_index);
        while let Some(index) = current {
            let node = &self.stacks[index as usize];
            let frame = &self.frames[node.frame_index as usize];
            stack.push(StackFrame {
                name: frame.name.clone(),
                category: self.categories[frame.category_index as usize].clone(),
            });
            current = node.parent;
        }
        stack
    }

    /// Expand into the denormalized layout, duplicating stacks per sample.
    pub fn to_denormalized(&self) -> DenormalizedProfile {
        DenormalizedProfile {
            samples: self
                .samples
                .iter()
                .map(|sample| denormalized::Sample {
                    time: sample.time,
                    stack: self.resolve_stack(sample.stack_index),
                    weight: sample.weight,
                })
                .collect(),
        }
    }

    /// Re-layout into parallel column vectors.
    pub fn to_columnar(&self) -> ColumnarProfile {
        ColumnarProfile {
            sample_table: SampleTable {
                time_column: self.samples.iter().map(|s| s.time).collect(),
                stack_index_column: self.samples.iter().map(|s| s.stack_index).collect(),
                weight_column: self.samples.iter().map(|s| s.weight).collect(),
            },
            stack_table: StackTable {
                parent_column: self.stacks.iter().map(|n| n.parent).collect(),
                frame_index_column: self.stacks.iter().map(|n| n.frame_index).collect(),
            },
            frame_table: FrameTable {
                name_column: self.frames.iter().map(|f| f.name.clone()).collect(),
                category_index_column: self.frames.iter().map(|f| f.category_index).collect(),
            },
            categories: self.categories.clone(),
        }
    }
}
