use std::fmt;

/// Scalar types a kernel can receive as a positional launch argument.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ArgKind {
    /// 32-bit unsigned integer.
    U32,
    /// 32-bit signed integer.
    I32,
}

impl fmt::Display for ArgKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ArgKind::U32 => write!(f, "u32"),
            ArgKind::I32 => write!(f, "i32"),
        }
    }
}

/// One positional kernel launch argument.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum KernelArg {
    U32(u32),
    I32(i32),
}

impl KernelArg {
    pub fn kind(&self) -> ArgKind {
        match self {
            KernelArg::U32(_) => ArgKind::U32,
            KernelArg::I32(_) => ArgKind::I32,
        }
    }

    /// The raw 32-bit word the kernel reads for this argument.
    pub fn to_bits(&self) -> u32 {
        match *self {
            KernelArg::U32(v) => v,
            KernelArg::I32(v) => v as u32,
        }
    }

    /// Rebuild an argument from its kind and raw word.
    pub fn from_bits(kind: ArgKind, bits: u32) -> Self {
        match kind {
            ArgKind::U32 => KernelArg::U32(bits),
            ArgKind::I32 => KernelArg::I32(bits as i32),
        }
    }
}

impl From<u32> for KernelArg {
    fn from(v: u32) -> Self {
        KernelArg::U32(v)
    }
}

impl From<i32> for KernelArg {
    fn from(v: i32) -> Self {
        KernelArg::I32(v)
    }
}

impl fmt::Display for KernelArg {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            KernelArg::U32(v) => write!(f, "{}u32", v),
            KernelArg::I32(v) => write!(f, "{}i32", v),
        }
    }
}

/// Destination for kernel launch arguments.
///
/// Implementations are slot-addressed: the caller decides the index, and a
/// later `set` to the same index overwrites the earlier value.
pub trait ArgSink {
    fn set(&mut self, index: usize, arg: KernelArg);
}

/// Host-side kernel argument list.
///
/// Slots that were never written read back as `None`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct KernelArgList {
    slots: Vec<Option<KernelArg>>,
}

impl KernelArgList {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of slots, including any unwritten gaps.
    pub fn len(&self) -> usize {
        self.slots.len()
    }

    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }

    pub fn get(&self, index: usize) -> Option<KernelArg> {
        self.slots.get(index).copied().flatten()
    }

    /// Written arguments in slot order, skipping gaps.
    pub fn values(&self) -> Vec<KernelArg> {
        self.slots.iter().flatten().copied().collect()
    }
}

impl ArgSink for KernelArgList {
    fn set(&mut self, index: usize, arg: KernelArg) {
        if index >= self.slots.len() {
            self.slots.resize(index + 1, None);
        }
        self.slots[index] = Some(arg);
    }
}

impl<S: ArgSink + ?Sized> ArgSink for &mut S {
    fn set(&mut self, index: usize, arg: KernelArg) {
        (**self).set(index, arg);
    }
}

/// Appends arguments to a sink starting at a caller-owned position.
///
/// The position is borrowed so that the caller can keep appending its own
/// arguments after the block written through the cursor.
pub struct ArgCursor<'a, S: ArgSink> {
    sink: S,
    position: &'a mut usize,
}

impl<'a, S: ArgSink> ArgCursor<'a, S> {
    pub fn new(sink: S, position: &'a mut usize) -> Self {
        Self { sink, position }
    }

    /// Write `arg` at the current position and advance by one.
    pub fn push(&mut self, arg: impl Into<KernelArg>) {
        self.sink.set(*self.position, arg.into());
        *self.position += 1;
    }

    pub fn position(&self) -> usize {
        *self.position
    }
}
