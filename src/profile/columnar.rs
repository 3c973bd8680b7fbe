//! Columnar representation: every table is a set of parallel column vectors.
//!
//! Same logical content as the normalized layout, but each field lives in
//! its own contiguous vector so range scans touch only the columns they
//! need. The selector layer additionally derives per-sample columns from
//! these tables and memoizes them per profile identity.

use super::{Stack, StackFrame};

/// Sample fields as parallel columns, sorted ascending by time.
#[derive(Debug, Clone, Default)]
pub struct SampleTable {
    pub time_column: Vec<f64>,
    pub stack_index_column: Vec<u32>,
    pub weight_column: Vec<f64>,
}

impl SampleTable {
    pub fn len(&self) -> usize {
        self.time_column.len()
    }

    pub fn is_empty(&self) -> bool {
        self.time_column.is_empty()
    }
}

/// Stack-table fields as parallel columns.
///
/// Parent indices are strictly smaller than their own index; `None`
/// marks a root.
#[derive(Debug, Clone, Default)]
pub struct StackTable {
    pub parent_column: Vec<Option<u32>>,
    pub frame_index_column: Vec<u32>,
}

impl StackTable {
    pub fn len(&self) -> usize {
        self.frame_index_column.len()
    }

    pub fn is_empty(&self) -> bool {
        self.frame_index_column.is_empty()
    }
}

/// Frame-table fields as parallel columns.
#[derive(Debug, Clone, Default)]
pub struct FrameTable {
    pub name_column: Vec<String>,
    pub category_index_column: Vec<u32>,
}

impl FrameTable {
    pub fn len(&self) -> usize {
        self.name_column.len()
    }

    pub fn is_empty(&self) -> bool {
        self.name_column.is_empty()
    }
}

/// Fully columnar profile.
#[derive(Debug, Clone, Default)]
pub struct ColumnarProfile {
    pub sample_table: SampleTable,
    pub stack_table: StackTable,
    pub frame_table: FrameTable,
    pub categories: Vec<String>,
}

impl ColumnarProfile {
    /// Materialize the leaf-to-root frame sequence for a stack-table entry.
    pub fn resolve_stack(&self, stack_index: u32) -> Stack {
        let mut stack = Stack::new();
        let mut current = Some(stack_index);
        while let Some(index) = current {
            let frame_index = self.stack_table.frame_index_column[index as usize] as usize;
            let category_index = self.frame_table.category_index_column[frame_index] as usize;
            stack.push(StackFrame {
                name: self.frame_table.name_column[frame_index].clone(),
                category: self.categories[category_index].clone(),
            });
            current = self.stack_table.parent_column[index as usize];
        }
        stack
    }
}
