//! Group arithmetic: safe-prime group parameters, their elements, and
//! runtime-sized vectors/matrices of those elements.

pub mod element;
pub mod matrix;
pub mod params;
pub mod vector;

pub use element::{GqElement, GqElementSeed, GroupElem, ZqElement, ZqElementSeed};
pub use matrix::GroupMatrix;
pub use params::{GqGroup, ZqGroup};
pub use vector::GroupVector;
