//! `GroupVector<T>`: a runtime-length, group-tagged vector of group
//! elements.
//!
//! Every element must belong to the same group; that group is carried
//! alongside the backing `Vec` so an empty vector still knows what it's a
//! vector *of* (a `GroupVector<GqElement>` of length 0 still belongs to a
//! particular `Gq`, it just has nothing in it).

use crate::error::{CryptoError, CryptoResult};
use crate::group::element::GroupElem;

#[derive(Clone, Debug)]
pub struct GroupVector<T: GroupElem> {
    elements: Vec<T>,
    group: T::Group,
}

impl<T: GroupElem> GroupVector<T> {
    /// Builds a vector from existing elements, requiring them to share one
    /// group. Fails on an empty slice, since there would be no element to
    /// read the group from — use [`GroupVector::empty`] for that case.
    pub fn new(elements: Vec<T>) -> CryptoResult<Self> {
        let group = elements
            .first()
            .map(|e| e.group().clone())
            .ok_or_else(|| CryptoError::invalid("GroupVector::new requires at least one element"))?;
        for e in &elements {
            if e.group() != &group {
                return Err(CryptoError::invalid(
                    "all elements of a GroupVector must share one group",
                ));
            }
        }
        Ok(GroupVector { elements, group })
    }

    /// An empty vector tagged with an explicit group, since there is no
    /// element to infer it from.
    pub fn empty(group: T::Group) -> Self {
        GroupVector {
            elements: Vec::new(),
            group,
        }
    }

    pub fn len(&self) -> usize {
        self.elements.len()
    }

    pub fn is_empty(&self) -> bool {
        self.elements.is_empty()
    }

    pub fn group(&self) -> &T::Group {
        &self.group
    }

    pub fn get(&self, index: usize) -> Option<&T> {
        self.elements.get(index)
    }

    pub fn as_slice(&self) -> &[T] {
        &self.elements
    }

    pub fn iter(&self) -> std::slice::Iter<'_, T> {
        self.elements.iter()
    }

    pub fn into_vec(self) -> Vec<T> {
        self.elements
    }

    /// Checks both vectors have equal length and the same group; the
    /// operation this is almost always called before is undefined (or a
    /// silent dimension mismatch) otherwise.
    pub fn check_compatible(&self, other: &Self) -> CryptoResult<()> {
        if self.group != other.group {
            return Err(CryptoError::group_mismatch(
                self.group.to_string(),
                other.group.to_string(),
            ));
        }
        if self.len() != other.len() {
            return Err(CryptoError::invalid(format!(
                "vector length mismatch: {} vs {}",
                self.len(),
                other.len()
            )));
        }
        Ok(())
    }
}

impl<T: GroupElem + PartialEq> PartialEq for GroupVector<T>
where
    T::Group: PartialEq,
{
    fn eq(&self, other: &Self) -> bool {
        self.group == other.group && self.elements == other.elements
    }
}

impl<T: GroupElem + Eq> Eq for GroupVector<T> where T::Group: Eq {}

impl<T: GroupElem> IntoIterator for GroupVector<T> {
    type Item = T;
    type IntoIter = std::vec::IntoIter<T>;

    fn into_iter(self) -> Self::IntoIter {
        self.elements.into_iter()
    }
}

impl<'a, T: GroupElem> IntoIterator for &'a GroupVector<T> {
    type Item = &'a T;
    type IntoIter = std::slice::Iter<'a, T>;

    fn into_iter(self) -> Self::IntoIter {
        self.elements.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::group::element::ZqElement;
    use crate::group::params::ZqGroup;
    use num_bigint::BigUint;
    use std::sync::Arc;

    fn group() -> Arc<ZqGroup> {
        Arc::new(ZqGroup::new(BigUint::from(11u32)))
    }

    #[test]
    fn new_rejects_empty() {
        let v: CryptoResult<GroupVector<ZqElement>> = GroupVector::new(vec![]);
        assert!(v.is_err());
    }

    #[test]
    fn new_rejects_mixed_groups() {
        let g1 = group();
        let g2 = Arc::new(ZqGroup::new(BigUint::from(23u32)));
        let a = ZqElement::from_u64(1, g1);
        let b = ZqElement::from_u64(1, g2);
        assert!(GroupVector::new(vec![a, b]).is_err());
    }

    #[test]
    fn length_and_group_accessors() {
        let g = group();
        let v = GroupVector::new(vec![
            ZqElement::from_u64(1, g.clone()),
            ZqElement::from_u64(2, g.clone()),
            ZqElement::from_u64(3, g.clone()),
        ])
        .unwrap();
        assert_eq!(v.len(), 3);
        assert_eq!(v.group(), &g);
    }

    #[test]
    fn check_compatible_catches_length_mismatch() {
        let g = group();
        let a = GroupVector::new(vec![ZqElement::from_u64(1, g.clone())]).unwrap();
        let b = GroupVector::new(vec![
            ZqElement::from_u64(1, g.clone()),
            ZqElement::from_u64(2, g),
        ])
        .unwrap();
        assert!(a.check_compatible(&b).is_err());
    }
}
