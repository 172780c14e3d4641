//! Fallible-allocation helpers shared by the owned-data paths (`buffer`,
//! `io::VecOutput`, `codec`, `dom`). Every growth point here goes through
//! `try_reserve`/`try_reserve_exact` so a hostile or oversized input fails
//! with `Error::Overflow` instead of aborting the process.

use crate::error::{Error, ErrorKind};
use alloc::boxed::Box;
use alloc::string::String;
use alloc::vec::Vec;

#[inline]
const fn alloc_failed(offset: usize) -> Error {
    Error::new(ErrorKind::Overflow, offset)
}

/// Reserve `additional` more elements of capacity, failing with `Overflow`
/// (rather than aborting) if the allocator cannot satisfy the request.
#[inline]
pub fn try_reserve<T>(vec: &mut Vec<T>, additional: usize, offset: usize) -> Result<(), Error> {
    vec.try_reserve(additional).map_err(|_| alloc_failed(offset))
}

/// Copy `bytes` into a freshly allocated, exactly-sized `Vec<u8>`.
#[inline]
pub fn try_vec_from_slice(bytes: &[u8], offset: usize) -> Result<Vec<u8>, Error> {
    let mut v = Vec::new();
    v.try_reserve_exact(bytes.len())
        .map_err(|_| alloc_failed(offset))?;
    v.extend_from_slice(bytes);
    Ok(v)
}

/// Copy `s` into a freshly allocated, exactly-sized `Box<str>`.
#[inline]
pub fn try_box_str_from_str(s: &str, offset: usize) -> Result<Box<str>, Error> {
    let mut out = String::new();
    out.try_reserve_exact(s.len())
        .map_err(|_| alloc_failed(offset))?;
    out.push_str(s);
    Ok(out.into_boxed_str())
}

/// An empty `Vec<T>` with exactly `cap` elements of pre-reserved capacity.
#[inline]
pub fn try_vec_with_capacity<T>(cap: usize, offset: usize) -> Result<Vec<T>, Error> {
    let mut v: Vec<T> = Vec::new();
    v.try_reserve_exact(cap).map_err(|_| alloc_failed(offset))?;
    Ok(v)
}
