//! Captured values.
//!
//! Matchers append to a [`Captures`] list in matcher order. Handlers take
//! the values either by index or all at once through [`FromCaptures`],
//! which fixes the number and types of captures a handler accepts.

use std::fmt;

use serde::Serialize;

use crate::routing::types::{RoutingError, RoutingResult};

/// A single captured value.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(untagged)]
pub enum Capture {
    Str(String),
    Int(i64),
}

impl Capture {
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Capture::Str(s) => Some(s),
            Capture::Int(_) => None,
        }
    }

    pub fn as_int(&self) -> Option<i64> {
        match self {
            Capture::Int(i) => Some(*i),
            Capture::Str(_) => None,
        }
    }
}

impl fmt::Display for Capture {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Capture::Str(s) => f.write_str(s),
            Capture::Int(i) => write!(f, "{}", i),
        }
    }
}

impl From<&str> for Capture {
    fn from(s: &str) -> Self {
        Capture::Str(s.to_string())
    }
}

impl From<String> for Capture {
    fn from(s: String) -> Self {
        Capture::Str(s)
    }
}

impl From<i64> for Capture {
    fn from(i: i64) -> Self {
        Capture::Int(i)
    }
}

/// Ordered captures of one match attempt.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct Captures(Vec<Capture>);

impl Captures {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, capture: impl Into<Capture>) {
        self.0.push(capture.into());
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn get(&self, index: usize) -> Option<&Capture> {
        self.0.get(index)
    }

    /// The capture at `index` if it is a string.
    pub fn str(&self, index: usize) -> Option<&str> {
        self.get(index).and_then(Capture::as_str)
    }

    /// The capture at `index` if it is an integer.
    pub fn int(&self, index: usize) -> Option<i64> {
        self.get(index).and_then(Capture::as_int)
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Capture> {
        self.0.iter()
    }

    pub fn as_slice(&self) -> &[Capture] {
        &self.0
    }

    /// Drop everything after the first `len` captures.
    pub fn truncate(&mut self, len: usize) {
        self.0.truncate(len);
    }

    pub fn extend(&mut self, other: impl IntoIterator<Item = Capture>) {
        self.0.extend(other);
    }

    /// Convert into a statically typed tuple, checking arity and types.
    pub fn extract<T: FromCaptures>(self) -> RoutingResult<T> {
        T::from_captures(self.0)
    }

    pub fn into_vec(self) -> Vec<Capture> {
        self.0
    }
}

impl From<Vec<Capture>> for Captures {
    fn from(v: Vec<Capture>) -> Self {
        Self(v)
    }
}

impl IntoIterator for Captures {
    type Item = Capture;
    type IntoIter = std::vec::IntoIter<Capture>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.into_iter()
    }
}

impl<'a> IntoIterator for &'a Captures {
    type Item = &'a Capture;
    type IntoIter = std::slice::Iter<'a, Capture>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.iter()
    }
}

/// A type a single capture converts into.
pub trait FromCapture: Sized {
    /// Name used in [`RoutingError::CaptureType`].
    const KIND: &'static str;

    fn from_capture(capture: Capture) -> Option<Self>;
}

impl FromCapture for Capture {
    const KIND: &'static str = "capture";

    fn from_capture(capture: Capture) -> Option<Self> {
        Some(capture)
    }
}

impl FromCapture for String {
    const KIND: &'static str = "string";

    fn from_capture(capture: Capture) -> Option<Self> {
        match capture {
            Capture::Str(s) => Some(s),
            Capture::Int(i) => Some(i.to_string()),
        }
    }
}

impl FromCapture for i64 {
    const KIND: &'static str = "integer";

    fn from_capture(capture: Capture) -> Option<Self> {
        capture.as_int()
    }
}

/// A fixed-arity set of captures.
pub trait FromCaptures: Sized {
    const ARITY: usize;

    fn from_captures(captures: Vec<Capture>) -> RoutingResult<Self>;
}

macro_rules! impl_from_captures {
    ($arity:expr; $($ty:ident),*) => {
        impl<$($ty: FromCapture),*> FromCaptures for ($($ty,)*) {
            const ARITY: usize = $arity;

            #[allow(unused_mut, unused_variables)]
            fn from_captures(captures: Vec<Capture>) -> RoutingResult<Self> {
                if captures.len() != Self::ARITY {
                    return Err(RoutingError::CaptureArity {
                        expected: Self::ARITY,
                        actual: captures.len(),
                    });
                }

                let mut iter = captures.into_iter().enumerate();
                Ok(($(
                    {
                        let (index, capture) = iter.next().ok_or(RoutingError::CaptureArity {
                            expected: Self::ARITY,
                            actual: 0,
                        })?;
                        <$ty as FromCapture>::from_capture(capture).ok_or(
                            RoutingError::CaptureType {
                                index,
                                expected: <$ty as FromCapture>::KIND,
                            },
                        )?
                    },
                )*))
            }
        }
    };
}

impl_from_captures!(0;);
impl_from_captures!(1; A);
impl_from_captures!(2; A, B);
impl_from_captures!(3; A, B, C);
impl_from_captures!(4; A, B, C, D);
