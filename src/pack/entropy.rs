//! Sources of the random bytes used by the encrypted container.
//!
//! Every token needs a fresh 16 byte IV. [`RandEntropy`] draws it from a [`rand`] generator, and
//! [`EntropyMock`] hands out fixed bytes so that tests produce stable tokens.
//!
//! [`rand`]: https://crates.io/crates/rand

/// A source of random bytes.
pub trait Entropy {
    /// Fills `dest` with random bytes.
    fn fill(&mut self, dest: &mut [u8]);
}

impl<T: Entropy + ?Sized> Entropy for Box<T> {
    fn fill(&mut self, dest: &mut [u8]) {
        T::fill(self, dest);
    }
}

/// A deterministic source that repeats its bytes in rotation.
///
/// ```rust
/// use pvdb_rs::pack::entropy::{Entropy, EntropyMock};
///
/// let mut entropy = EntropyMock([1, 2, 3]);
/// let mut buf = [0; 4];
/// entropy.fill(&mut buf);
/// assert_eq!(buf, [1, 2, 3, 1]);
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct EntropyMock<const N: usize>(pub [u8; N]);

impl<const N: usize> Entropy for EntropyMock<N> {
    fn fill(&mut self, dest: &mut [u8]) {
        for byte in dest {
            let Some(&first) = self.0.first() else {
                *byte = 0;
                continue;
            };
            *byte = first;
            self.0.rotate_left(1);
        }
    }
}

/// A source backed by any [`rand::RngCore`].
///
/// ```rust
/// # #[cfg(feature = "rand")]
/// # {
/// use pvdb_rs::pack::entropy::{Entropy, RandEntropy};
/// use rand::{SeedableRng, rngs::StdRng};
///
/// let mut entropy = RandEntropy(StdRng::seed_from_u64(39));
/// let mut iv = [0; 16];
/// entropy.fill(&mut iv);
/// # }
/// ```
#[cfg(feature = "rand")]
#[derive(Debug, Clone)]
pub struct RandEntropy<R>(pub R);

#[cfg(feature = "rand")]
impl<R: rand::RngCore> Entropy for RandEntropy<R> {
    fn fill(&mut self, dest: &mut [u8]) {
        self.0.fill_bytes(dest);
    }
}

#[cfg(feature = "rand")]
impl RandEntropy<rand::rngs::StdRng> {
    /// A generator seeded by the operating system.
    #[must_use]
    pub fn from_os_rng() -> Self {
        use rand::SeedableRng;
        Self(rand::rngs::StdRng::from_os_rng())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn mock_rotates_across_calls() {
        let mut entropy = EntropyMock([7, 8]);
        let mut a = [0; 3];
        let mut b = [0; 3];
        entropy.fill(&mut a);
        entropy.fill(&mut b);
        assert_eq!(a, [7, 8, 7]);
        assert_eq!(b, [8, 7, 8]);
    }

    #[test]
    fn empty_mock_yields_zeros() {
        let mut buf = [9; 2];
        EntropyMock([]).fill(&mut buf);
        assert_eq!(buf, [0, 0]);
    }
}
