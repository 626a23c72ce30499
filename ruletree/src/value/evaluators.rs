// ruletree. Composable packrat grammars
// Copyright (c) 2018 Dragoș Tiselice
//
// Licensed under the Apache License, Version 2.0
// <LICENSE-APACHE or http://www.apache.org/licenses/LICENSE-2.0> or the MIT
// license <LICENSE-MIT or http://opensource.org/licenses/MIT>, at your
// option. All files in the project carrying such notice may not be copied,
// modified, or distributed except according to those terms.

use std::any::{type_name, Any, TypeId};
use std::cmp::Ordering;
use std::collections::VecDeque;
use std::fmt;
use std::marker::PhantomData;
use std::sync::Arc;

use crate::error::Error;
use crate::node::Node;

use super::Value;

pub(crate) type TypedValue = Arc<dyn Any + Send + Sync>;

/// Computes the value carried by the nodes of a value rule.
pub(crate) trait Evaluate: Send + Sync {
    fn value_type(&self) -> TypeId;

    /// Eager values are computed as soon as the node is created.
    fn is_eager(&self) -> bool;

    fn evaluate(&self, node: &Node<'_>) -> Result<TypedValue, Error>;
}

/// Breadth-first search below a node (excluding it) that yields the nodes carrying a `T` and
/// does not descend into them.
pub(crate) struct ValueNodes<'a, 'i, T> {
    queue: VecDeque<&'a Node<'i>>,
    marker: PhantomData<fn() -> T>,
}

impl<'a, 'i, T: Value> ValueNodes<'a, 'i, T> {
    pub(crate) fn below(node: &'a Node<'i>) -> Self {
        ValueNodes {
            queue: node.leafs().iter().collect(),
            marker: PhantomData,
        }
    }
}

impl<'a, 'i, T: Value> Iterator for ValueNodes<'a, 'i, T> {
    type Item = &'a Node<'i>;

    fn next(&mut self) -> Option<Self::Item> {
        while let Some(node) = self.queue.pop_front() {
            if node.is_value_node::<T>() {
                return Some(node);
            }
            self.queue.extend(node.leafs());
        }
        None
    }
}

fn first_below<T: Value>(node: &Node<'_>) -> Result<T, Error> {
    match ValueNodes::<T>::below(node).next() {
        Some(found) => found.value::<T>(),
        None => Err(Error::evaluation(format!(
            "no value of type {} below '{}'",
            type_name::<T>(),
            node
        ))),
    }
}

pub(crate) struct Constant<T>(pub(crate) T);

impl<T: Value> Evaluate for Constant<T> {
    fn value_type(&self) -> TypeId {
        TypeId::of::<T>()
    }

    fn is_eager(&self) -> bool {
        true
    }

    fn evaluate(&self, _: &Node<'_>) -> Result<TypedValue, Error> {
        Ok(Arc::new(self.0.clone()))
    }
}

pub(crate) struct ConvertText<T, F> {
    convert: F,
    marker: PhantomData<fn() -> T>,
}

impl<T, F> ConvertText<T, F> {
    pub(crate) fn new(convert: F) -> Self {
        ConvertText {
            convert,
            marker: PhantomData,
        }
    }
}

impl<T, F> Evaluate for ConvertText<T, F>
where
    T: Value,
    F: Fn(&str) -> T + Send + Sync,
{
    fn value_type(&self) -> TypeId {
        TypeId::of::<T>()
    }

    fn is_eager(&self) -> bool {
        true
    }

    fn evaluate(&self, node: &Node<'_>) -> Result<TypedValue, Error> {
        Ok(Arc::new((self.convert)(node.as_str())))
    }
}

pub(crate) struct ConvertNode<T, F> {
    convert: F,
    marker: PhantomData<fn() -> T>,
}

impl<T, F> ConvertNode<T, F> {
    pub(crate) fn new(convert: F) -> Self {
        ConvertNode {
            convert,
            marker: PhantomData,
        }
    }
}

impl<T, F> Evaluate for ConvertNode<T, F>
where
    T: Value,
    F: Fn(&Node<'_>) -> T + Send + Sync,
{
    fn value_type(&self) -> TypeId {
        TypeId::of::<T>()
    }

    fn is_eager(&self) -> bool {
        true
    }

    fn evaluate(&self, node: &Node<'_>) -> Result<TypedValue, Error> {
        Ok(Arc::new((self.convert)(node)))
    }
}

pub(crate) struct TryConvert<T, E, F> {
    convert: F,
    marker: PhantomData<fn() -> (T, E)>,
}

impl<T, E, F> TryConvert<T, E, F> {
    pub(crate) fn new(convert: F) -> Self {
        TryConvert {
            convert,
            marker: PhantomData,
        }
    }
}

impl<T, E, F> Evaluate for TryConvert<T, E, F>
where
    T: Value,
    E: fmt::Display,
    F: Fn(&str) -> Result<T, E> + Send + Sync,
{
    fn value_type(&self) -> TypeId {
        TypeId::of::<T>()
    }

    fn is_eager(&self) -> bool {
        true
    }

    fn evaluate(&self, node: &Node<'_>) -> Result<TypedValue, Error> {
        match (self.convert)(node.as_str()) {
            Ok(value) => Ok(Arc::new(value)),
            Err(error) => Err(Error::evaluation(format!(
                "could not convert '{}' into {}: {}",
                node.as_str(),
                type_name::<T>(),
                error
            ))),
        }
    }
}

pub(crate) struct Accumulate<T, F> {
    accumulate: F,
    marker: PhantomData<fn() -> T>,
}

impl<T, F> Accumulate<T, F> {
    pub(crate) fn new(accumulate: F) -> Self {
        Accumulate {
            accumulate,
            marker: PhantomData,
        }
    }
}

impl<T, F> Evaluate for Accumulate<T, F>
where
    T: Value,
    F: Fn(T, T) -> T + Send + Sync,
{
    fn value_type(&self) -> TypeId {
        TypeId::of::<T>()
    }

    fn is_eager(&self) -> bool {
        false
    }

    fn evaluate(&self, node: &Node<'_>) -> Result<TypedValue, Error> {
        let mut values = ValueNodes::<T>::below(node).map(|found| found.value::<T>());

        let seed = match values.next() {
            Some(value) => value?,
            None => {
                return Err(Error::evaluation(format!(
                    "'{}' did not yield any values of type {} to accumulate",
                    node,
                    type_name::<T>()
                )))
            }
        };

        let total = values.try_fold(seed, |total, value| {
            value.map(|value| (self.accumulate)(total, value))
        })?;

        Ok(Arc::new(total))
    }
}

pub(crate) struct First<T>(PhantomData<fn() -> T>);

impl<T> First<T> {
    pub(crate) fn new() -> Self {
        First(PhantomData)
    }
}

impl<T: Value> Evaluate for First<T> {
    fn value_type(&self) -> TypeId {
        TypeId::of::<T>()
    }

    fn is_eager(&self) -> bool {
        false
    }

    fn evaluate(&self, node: &Node<'_>) -> Result<TypedValue, Error> {
        Ok(Arc::new(first_below::<T>(node)?))
    }
}

pub(crate) type Compare<T> = Box<dyn Fn(&T, &T) -> Option<Ordering> + Send + Sync>;

pub(crate) struct Range<T> {
    minimum: T,
    maximum: T,
    compare: Compare<T>,
}

impl<T> Range<T> {
    pub(crate) fn new(minimum: T, maximum: T, compare: Compare<T>) -> Self {
        Range {
            minimum,
            maximum,
            compare,
        }
    }

    fn contains(&self, value: &T) -> bool {
        let above_minimum = matches!(
            (self.compare)(value, &self.minimum),
            Some(Ordering::Greater | Ordering::Equal)
        );
        let below_maximum = matches!(
            (self.compare)(value, &self.maximum),
            Some(Ordering::Less | Ordering::Equal)
        );

        above_minimum && below_maximum
    }
}

impl<T: Value + fmt::Debug> Evaluate for Range<T> {
    fn value_type(&self) -> TypeId {
        TypeId::of::<T>()
    }

    fn is_eager(&self) -> bool {
        false
    }

    fn evaluate(&self, node: &Node<'_>) -> Result<TypedValue, Error> {
        let value = first_below::<T>(node)?;

        if self.contains(&value) {
            Ok(Arc::new(value))
        } else {
            Err(Error::evaluation(format!(
                "value {:?} is outside the range {:?}..={:?}",
                value, self.minimum, self.maximum
            )))
        }
    }
}
