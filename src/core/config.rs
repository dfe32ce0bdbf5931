/// Batch size used as the scaling baseline for a 1 GiB memory budget.
pub const BASELINE_BATCH_SIZE: usize = 2048;

const BYTES_PER_GIB: f64 = 1024.0 * 1024.0 * 1024.0;

/// Growth class of the memory footprint of one batch, used to scale the
/// baseline batch size to the available memory.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Complexity {
    Linear,
    Quadratic,
    Cubic,
}

impl Complexity {
    fn order(self) -> f64 {
        match self {
            Complexity::Linear => 1.0,
            Complexity::Quadratic => 2.0,
            Complexity::Cubic => 3.0,
        }
    }
}

/// Memory available to one engine invocation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MemoryBudget {
    available_bytes: u64,
}

impl MemoryBudget {
    pub fn from_bytes(available_bytes: u64) -> Self {
        Self { available_bytes }
    }

    pub fn from_gib(gib: f64) -> Self {
        Self {
            available_bytes: (gib.max(0.0) * BYTES_PER_GIB) as u64,
        }
    }

    pub fn available_bytes(&self) -> u64 {
        self.available_bytes
    }

    /// Scale `baseline` by `gib^(1/order)`; never returns less than 1.
    pub fn scale(&self, baseline: usize, complexity: Complexity) -> usize {
        let gib = self.available_bytes as f64 / BYTES_PER_GIB;
        let factor = gib.powf(1.0 / complexity.order());
        ((baseline as f64 * factor).floor() as usize).max(1)
    }
}

impl Default for MemoryBudget {
    fn default() -> Self {
        Self::from_gib(4.0)
    }
}

/// Configuration for matrix profile computation.
#[derive(Debug, Clone)]
pub struct MatrixProfileConfig {
    /// Subsequence length.
    pub m: usize,
    /// Memory available for one batch of the distance matrix.
    pub memory_budget: MemoryBudget,
    /// Footprint growth class used to derive the batch threshold.
    pub complexity: Complexity,
    /// Explicit batch threshold; overrides the memory-derived value.
    pub batch_size: Option<usize>,
}

impl MatrixProfileConfig {
    pub fn new(m: usize) -> Self {
        Self {
            m,
            memory_budget: MemoryBudget::default(),
            complexity: Complexity::Cubic,
            batch_size: None,
        }
    }

    pub fn with_memory_budget(mut self, memory_budget: MemoryBudget) -> Self {
        self.memory_budget = memory_budget;
        self
    }

    pub fn with_complexity(mut self, complexity: Complexity) -> Self {
        self.complexity = complexity;
        self
    }

    pub fn with_batch_size(mut self, batch_size: usize) -> Self {
        self.batch_size = Some(batch_size.max(1));
        self
    }

    /// Number of subsequence offsets processed per batch along either axis.
    pub fn batch_threshold(&self) -> usize {
        match self.batch_size {
            Some(b) => b,
            None => self
                .memory_budget
                .scale(BASELINE_BATCH_SIZE, self.complexity),
        }
    }
}
