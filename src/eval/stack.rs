use core::fmt;

/// A growable last-in-first-out stack backing both the operand and operator
/// stacks of the evaluator.
#[derive(Debug, Clone)]
pub struct Stack<T> {
    data: Vec<T>,
}

impl<T> Stack<T> {
    /// Stack initializer type.
    pub fn new() -> Self {
        Self { data: Vec::new() }
    }

    pub fn empty(&self) -> bool {
        self.data.is_empty()
    }

    pub fn push_mut(&mut self, val: T) {
        self.data.push(val)
    }

    pub fn pop_mut(&mut self) -> Option<T> {
        self.data.pop()
    }

    pub fn peek(&self) -> Option<&T> {
        self.data.last()
    }

    /// Pops every element off the stack, returning the number of elements
    /// released.
    pub fn drain_mut(&mut self) -> usize {
        let mut released = 0;
        while self.pop_mut().is_some() {
            released += 1;
        }

        released
    }
}

impl<T> Default for Stack<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> AsRef<[T]> for Stack<T> {
    fn as_ref(&self) -> &[T] {
        &self.data
    }
}

/// Renders the stack bottom to top, i.e. `NULL<-1<-2<-top`.
impl<T: fmt::Display> fmt::Display for Stack<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "NULL")?;
        for elem in self.data.iter() {
            write!(f, "<-{}", elem)?;
        }
        write!(f, "<-top")
    }
}
