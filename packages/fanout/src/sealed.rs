/// Restricts implementations of a public trait to this crate.
#[expect(
    unnameable_types,
    reason = "sealed trait, reachable only as a supertrait bound"
)]
pub trait Sealed {}
