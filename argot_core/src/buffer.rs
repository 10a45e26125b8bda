use std::collections::VecDeque;
use thiserror::Error;

/// Failure to construct or rewind a [`BufferedEnumerator`].
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum BufferError {
    /// The buffer must hold at least one item.
    #[error("Buffer size must be greater than 0.")]
    EmptyBuffer,

    /// Not enough history was buffered to satisfy a strict rollback.
    #[error("Cannot rollback {requested} item(s); only {available} available.")]
    RollbackUnavailable {
        /// The number of items asked for.
        requested: usize,
        /// The number of items that could have been rolled back.
        available: usize,
    },
}

/// A forward-only cursor over an iterator which remembers the last `size` yielded items.
///
/// Rolling back `k` items makes the next `k` advances replay the most recently yielded `k` items, in their original order.
/// This lets the tokenizer speculatively consume a token and undo that decision without a second pass over the input.
///
/// ### Example
/// ```
/// # use argot_core as argot;
/// use argot::BufferedEnumerator;
///
/// let mut input = BufferedEnumerator::new(vec!["a", "b", "c"].into_iter(), 2).unwrap();
/// assert_eq!(input.next(), Some("a"));
/// assert_eq!(input.next(), Some("b"));
/// input.rollback(1).unwrap();
/// assert_eq!(input.next(), Some("b"));
/// assert_eq!(input.next(), Some("c"));
/// ```
#[derive(Debug)]
pub struct BufferedEnumerator<I: Iterator> {
    origin: Option<I>,
    iterator: I,
    size: usize,
    buffer: VecDeque<I::Item>,
    pending: usize,
    exhausted: bool,
}

impl<I> BufferedEnumerator<I>
where
    I: Iterator,
    I::Item: Clone,
{
    /// Wrap `iterator`, remembering up to `size` of its most recent items.
    pub fn new(iterator: I, size: usize) -> Result<Self, BufferError> {
        if size == 0 {
            return Err(BufferError::EmptyBuffer);
        }

        Ok(Self {
            origin: None,
            iterator,
            size,
            buffer: VecDeque::with_capacity(size),
            pending: 0,
            exhausted: false,
        })
    }

    /// Advance the cursor.
    /// Returns `false` once the underlying iterator (and any pending rollback) is exhausted.
    pub fn move_next(&mut self) -> bool {
        if self.pending > 0 {
            self.pending -= 1;
            self.exhausted = false;
            return true;
        }

        match self.iterator.next() {
            Some(item) => {
                if self.buffer.len() == self.size {
                    self.buffer.pop_front();
                }

                self.buffer.push_back(item);
                self.exhausted = false;
                true
            }
            None => {
                self.exhausted = true;
                false
            }
        }
    }

    /// The item under the cursor, if any.
    pub fn current(&self) -> Option<&I::Item> {
        if self.exhausted || self.pending >= self.buffer.len() {
            None
        } else {
            self.buffer.get(self.buffer.len() - 1 - self.pending)
        }
    }

    /// The number of positions a rollback may currently move back.
    pub fn available(&self) -> usize {
        self.buffer.len() - self.pending
    }

    /// Move the cursor back up to `count` positions.
    /// Returns how many positions were actually rolled back, which is less than `count` when history runs out.
    pub fn try_rollback(&mut self, count: usize) -> usize {
        let rolled = std::cmp::min(count, self.available());

        if rolled > 0 {
            self.pending += rolled;
            self.exhausted = false;
        }

        rolled
    }

    /// Move the cursor back precisely `count` positions, or fail without moving.
    pub fn rollback(&mut self, count: usize) -> Result<(), BufferError> {
        let available = self.available();

        if count > available {
            return Err(BufferError::RollbackUnavailable {
                requested: count,
                available,
            });
        }

        self.try_rollback(count);
        Ok(())
    }
}

impl<I> BufferedEnumerator<I>
where
    I: Iterator + Clone,
    I::Item: Clone,
{
    /// Wrap a rewindable `iterator`; [`BufferedEnumerator::reset`] will restart from its current state.
    pub fn rewindable(iterator: I, size: usize) -> Result<Self, BufferError> {
        let mut enumerator = Self::new(iterator.clone(), size)?;
        enumerator.origin.replace(iterator);
        Ok(enumerator)
    }

    /// Clear all buffered state and rewind the underlying iterator.
    /// Enumerators created via [`BufferedEnumerator::new`] only clear their buffer.
    pub fn reset(&mut self) {
        if let Some(origin) = &self.origin {
            self.iterator = origin.clone();
        }

        self.buffer.clear();
        self.pending = 0;
        self.exhausted = false;
    }
}

impl<I> Iterator for BufferedEnumerator<I>
where
    I: Iterator,
    I::Item: Clone,
{
    type Item = I::Item;

    fn next(&mut self) -> Option<Self::Item> {
        if self.move_next() {
            self.current().cloned()
        } else {
            None
        }
    }
}
