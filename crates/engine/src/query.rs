//! Query engine
//!
//! Stateless building blocks run against already-loaded entities:
//!
//! | Operation | Function |
//! |-----------|----------|
//! | Equality / range / threshold filter | [`Filter`] |
//! | Inner join on key equality | [`inner_join`] |
//! | Group with counts | [`group_count`] |
//! | Sort by a field named at call time | [`sort_by_field`] |
//! | 1-based pagination | [`paginate`] |
//!
//! Nothing here touches the store.

use crate::entity::Entity;
use crate::schema::{resolve, Field, FieldRef};
use std::cmp::Ordering;
use std::collections::HashMap;
use std::hash::Hash;
use std::str::FromStr;
use stockroom_core::{Scalar, StoreError, StoreResult};

// =============================================================================
// Filter
// =============================================================================

/// One clause of a [`Filter`]
#[derive(Debug, Clone, PartialEq)]
pub enum Condition {
    /// Field equals the value
    Eq(Scalar),
    /// `low <= field <= high`
    Between(Scalar, Scalar),
    /// `field < value`
    LessThan(Scalar),
    /// `field >= value`
    AtLeast(Scalar),
}

/// Conjunction of field conditions, resolved against an entity's field table
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Filter {
    clauses: Vec<(String, Condition)>,
}

impl Filter {
    /// Filter matching everything.
    pub fn new() -> Self {
        Self::default()
    }

    /// Require `field == value`.
    pub fn eq(self, field: &str, value: impl Into<Scalar>) -> Self {
        self.with(field, Condition::Eq(value.into()))
    }

    /// Require `low <= field <= high` (inclusive on both ends).
    pub fn between(self, field: &str, low: impl Into<Scalar>, high: impl Into<Scalar>) -> Self {
        self.with(field, Condition::Between(low.into(), high.into()))
    }

    /// Require `field < value`.
    pub fn less_than(self, field: &str, value: impl Into<Scalar>) -> Self {
        self.with(field, Condition::LessThan(value.into()))
    }

    /// Require `field >= value`.
    pub fn at_least(self, field: &str, value: impl Into<Scalar>) -> Self {
        self.with(field, Condition::AtLeast(value.into()))
    }

    fn with(mut self, field: &str, condition: Condition) -> Self {
        self.clauses.push((field.to_string(), condition));
        self
    }

    /// Resolve fields and values for `E`.
    ///
    /// # Errors
    ///
    /// * `InvalidQueryField` - a field is not in `E`'s table
    /// * `Validation` - a value does not have the field's type
    pub fn compile<E: Entity>(&self) -> StoreResult<CompiledFilter<'_, E>> {
        let mut clauses = Vec::with_capacity(self.clauses.len());
        for (name, condition) in &self.clauses {
            let field = resolve::<E>(name)?;
            let bound = match condition {
                Condition::Eq(v) => Bound::Eq(typed(field, v)?),
                Condition::Between(lo, hi) => Bound::Between(typed(field, lo)?, typed(field, hi)?),
                Condition::LessThan(v) => Bound::LessThan(typed(field, v)?),
                Condition::AtLeast(v) => Bound::AtLeast(typed(field, v)?),
            };
            clauses.push((field, bound));
        }
        Ok(CompiledFilter { clauses })
    }

    /// Keep the items matching every clause, preserving order.
    pub fn apply<E: Entity>(&self, items: Vec<E>) -> StoreResult<Vec<E>> {
        let compiled = self.compile::<E>()?;
        Ok(items.into_iter().filter(|item| compiled.matches(item)).collect())
    }
}

fn typed<'f, E>(field: &Field<E>, value: &'f Scalar) -> StoreResult<FieldRef<'f>> {
    FieldRef::from_scalar(field.ty, value).ok_or_else(|| {
        StoreError::validation(format!(
            "value {:?} is not a valid {} for field '{}'",
            value, field.ty, field.name
        ))
    })
}

enum Bound<'f> {
    Eq(FieldRef<'f>),
    Between(FieldRef<'f>, FieldRef<'f>),
    LessThan(FieldRef<'f>),
    AtLeast(FieldRef<'f>),
}

/// A [`Filter`] bound to one entity type
pub struct CompiledFilter<'f, E: 'static> {
    clauses: Vec<(&'static Field<E>, Bound<'f>)>,
}

impl<E: 'static> CompiledFilter<'_, E> {
    /// Whether `item` satisfies every clause.
    pub fn matches(&self, item: &E) -> bool {
        self.clauses.iter().all(|(field, bound)| {
            let value = (field.get)(item);
            match bound {
                Bound::Eq(v) => value.compare(v) == Ordering::Equal,
                Bound::Between(lo, hi) => {
                    value.compare(lo) != Ordering::Less && value.compare(hi) != Ordering::Greater
                }
                Bound::LessThan(v) => value.compare(v) == Ordering::Less,
                Bound::AtLeast(v) => value.compare(v) != Ordering::Less,
            }
        })
    }
}

// =============================================================================
// Inner Join
// =============================================================================

/// Lazy nested-loop inner join
///
/// Yields `(left, right)` for every pair with equal keys, in left order and
/// then right order. Left items without a match are dropped; a left item
/// with N matches is yielded N times.
pub struct InnerJoin<'r, I: Iterator, R, K, FL, FR> {
    left: I,
    right: &'r [R],
    left_key: FL,
    right_key: FR,
    current: Option<(I::Item, K)>,
    next_right: usize,
}

/// Join `left` against `right` where `left_key(l) == right_key(r)`.
///
/// Joins compose: feed one join's output in as the next join's `left`.
pub fn inner_join<'r, I, R, K, FL, FR>(
    left: I,
    right: &'r [R],
    left_key: FL,
    right_key: FR,
) -> InnerJoin<'r, I::IntoIter, R, K, FL, FR>
where
    I: IntoIterator,
    I::Item: Clone,
    K: PartialEq,
    FL: Fn(&I::Item) -> K,
    FR: Fn(&R) -> K,
{
    InnerJoin {
        left: left.into_iter(),
        right,
        left_key,
        right_key,
        current: None,
        next_right: 0,
    }
}

impl<'r, I, R, K, FL, FR> Iterator for InnerJoin<'r, I, R, K, FL, FR>
where
    I: Iterator,
    I::Item: Clone,
    K: PartialEq,
    FL: Fn(&I::Item) -> K,
    FR: Fn(&R) -> K,
{
    type Item = (I::Item, &'r R);

    fn next(&mut self) -> Option<Self::Item> {
        let right = self.right;
        loop {
            if self.current.is_none() {
                let item = self.left.next()?;
                let key = (self.left_key)(&item);
                self.current = Some((item, key));
                self.next_right = 0;
            }

            if let Some((item, key)) = &self.current {
                while self.next_right < right.len() {
                    let candidate = &right[self.next_right];
                    self.next_right += 1;
                    if (self.right_key)(candidate) == *key {
                        return Some((item.clone(), candidate));
                    }
                }
            }
            self.current = None;
        }
    }
}

// =============================================================================
// Group + Count
// =============================================================================

/// Partition `rows` by `key`; one `(first row of group, row count)` per
/// group, groups in first-seen order.
pub fn group_count<T, K, F>(rows: impl IntoIterator<Item = T>, key: F) -> Vec<(T, usize)>
where
    K: Eq + Hash,
    F: Fn(&T) -> K,
{
    let mut slots: HashMap<K, usize> = HashMap::new();
    let mut groups: Vec<(T, usize)> = Vec::new();
    for row in rows {
        let k = key(&row);
        match slots.get(&k) {
            Some(&slot) => groups[slot].1 += 1,
            None => {
                slots.insert(k, groups.len());
                groups.push((row, 1));
            }
        }
    }
    groups
}

// =============================================================================
// Sort
// =============================================================================

/// Sort direction
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SortOrder {
    /// Smallest first
    #[default]
    Asc,
    /// Largest first
    Desc,
}

impl FromStr for SortOrder {
    type Err = StoreError;

    fn from_str(s: &str) -> StoreResult<Self> {
        match s.to_ascii_lowercase().as_str() {
            "asc" | "ascending" => Ok(SortOrder::Asc),
            "desc" | "descending" => Ok(SortOrder::Desc),
            other => Err(StoreError::validation(format!(
                "unknown sort order '{}', expected 'asc' or 'desc'",
                other
            ))),
        }
    }
}

/// Stable sort by the field named `field`, compared by its declared type.
///
/// # Errors
///
/// `InvalidQueryField` if `E` has no such field; `items` is left untouched.
pub fn sort_by_field<E: Entity>(items: &mut [E], field: &str, order: SortOrder) -> StoreResult<()> {
    let field = resolve::<E>(field)?;
    items.sort_by(|a, b| {
        let ord = (field.get)(a).compare(&(field.get)(b));
        match order {
            SortOrder::Asc => ord,
            SortOrder::Desc => ord.reverse(),
        }
    });
    Ok(())
}

// =============================================================================
// Pagination
// =============================================================================

/// Page `page` (1-based) of `page_size` items.
///
/// A page number or size of zero or less yields an empty page rather than
/// an error, as does a page past the end.
pub fn paginate<T>(items: impl IntoIterator<Item = T>, page: i64, page_size: i64) -> Vec<T> {
    if page <= 0 || page_size <= 0 {
        return Vec::new();
    }
    let skip = (page - 1)
        .checked_mul(page_size)
        .and_then(|skip| usize::try_from(skip).ok());
    let take = usize::try_from(page_size).ok();
    match (skip, take) {
        (Some(skip), Some(take)) => items.into_iter().skip(skip).take(take).collect(),
        _ => Vec::new(),
    }
}
