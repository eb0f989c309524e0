//! Values that flow through the engine.

use std::collections::{BTreeMap, BTreeSet, HashMap, HashSet, VecDeque};
use std::sync::Arc;

use serde_json::Value;
use transport::{classify, HttpResponse};

use crate::Raised;

/// A value that can be the success side of a step.
///
/// `is_absent` decides the "explicitly empty" policy: `None`, `()` and JSON
/// `null` are absent, while legitimately falsy values such as `0`, `false`
/// or `""` are not. `domain_failure` is the classification hook run on a
/// freshly resolved value; by default nothing is a domain failure.
///
/// Your own types opt in with an empty impl:
///
/// ```
/// use descriptor::Payload;
///
/// #[derive(Clone)]
/// struct User { id: u64 }
///
/// impl Payload for User {}
///
/// assert!(!User { id: 0 }.is_absent());
/// ```
pub trait Payload {
    /// `true` when the value stands for "nothing".
    fn is_absent(&self) -> bool { false }

    /// A failure this value represents by convention, if any.
    fn domain_failure(&self) -> Option<Raised> { None }
}

macro_rules! always_present {
    ($($ty:ty),* $(,)?) => {
        $(impl Payload for $ty {})*
    };
}

always_present!(
    bool, char, i8, i16, i32, i64, i128, isize, u8, u16, u32, u64, u128, usize, f32, f64, String,
);

impl Payload for &str {}

impl Payload for () {
    fn is_absent(&self) -> bool { true }
}

impl Payload for Value {
    fn is_absent(&self) -> bool { self.is_null() }
}

impl<T: Payload> Payload for Option<T> {
    fn is_absent(&self) -> bool { self.is_none() }

    fn domain_failure(&self) -> Option<Raised> { self.as_ref().and_then(Payload::domain_failure) }
}

impl<T: Payload + ?Sized> Payload for Box<T> {
    fn is_absent(&self) -> bool { (**self).is_absent() }

    fn domain_failure(&self) -> Option<Raised> { (**self).domain_failure() }
}

impl<T: Payload + ?Sized> Payload for Arc<T> {
    fn is_absent(&self) -> bool { (**self).is_absent() }

    fn domain_failure(&self) -> Option<Raised> { (**self).domain_failure() }
}

impl<T> Payload for Vec<T> {}
impl<T> Payload for VecDeque<T> {}
impl<T, S> Payload for HashSet<T, S> {}
impl<T> Payload for BTreeSet<T> {}
impl<K, V, S> Payload for HashMap<K, V, S> {}
impl<K, V> Payload for BTreeMap<K, V> {}
impl<A, B> Payload for (A, B) {}
impl<A, B, C> Payload for (A, B, C) {}

impl Payload for HttpResponse {
    fn domain_failure(&self) -> Option<Raised> { classify(self).map(Raised::from) }
}
