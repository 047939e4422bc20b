/// A value with a change counter.
///
/// Readers remember the last `version()` they saw and only redo work when it
/// moves. Setting an equal value leaves the version alone.

#[derive(Clone, Debug)]
pub struct Observable<T> {
    value: T,
    version: u64,
}

impl<T: PartialEq> Observable<T> {
    pub fn new(value: T) -> Self {
        Observable { value, version: 0 }
    }

    pub fn get(&self) -> &T {
        &self.value
    }

    pub fn version(&self) -> u64 {
        self.version
    }

    /// Store `value`. Returns `true` if it differed from the current one.
    pub fn set(&mut self, value: T) -> bool {
        if self.value == value {
            return false;
        }
        self.value = value;
        self.version = self.version.wrapping_add(1);
        true
    }

    /// `true` if the value changed since `seen`.
    pub fn changed_since(&self, seen: u64) -> bool {
        self.version != seen
    }
}
