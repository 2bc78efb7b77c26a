//! # Rule-Group Compiler
//!
//! Turns a schema's ordered items into the rules handed to form runners.
//!
//! Every maximal run of consecutive descriptors becomes exactly one
//! [`CompiledRule`], so a runner invokes one callback per run and the
//! pipeline's first-failure-wins ordering holds across the whole run. Raw
//! rules are emitted unchanged at their original position; they are never
//! reordered or merged with engine rules.
//!
//! ```text
//! [Desc, Desc, Raw, Desc]  ->  [Compiled(2), Raw, Compiled(1)]
//! [Desc, Desc, Desc]       ->  [Compiled(3)]
//! []                       ->  []
//! ```
//!
//! Compiled rules capture the schema's optional matcher at compile time and
//! a handle to the message table, which is read when a rule runs.

use std::fmt;
use std::sync::Arc;

use serde_json::Value;
use valr_core::{FormRule, RuleMeta, SchemaType};

use crate::kind::{KindDescriptor, SchemaKind};
use crate::pipeline::Evaluator;

/// One entry in a schema's item list.
pub enum Item<K: SchemaKind> {
    /// An engine descriptor.
    Descriptor(Arc<KindDescriptor<K>>),
    /// An externally authored rule appended with `concat` or `required`.
    Raw(FormRule),
}

impl<K: SchemaKind> Clone for Item<K> {
    fn clone(&self) -> Self {
        match self {
            Item::Descriptor(descriptor) => Item::Descriptor(Arc::clone(descriptor)),
            Item::Raw(rule) => Item::Raw(rule.clone()),
        }
    }
}

impl<K: SchemaKind> fmt::Debug for Item<K> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Item::Descriptor(descriptor) => fmt::Debug::fmt(descriptor, f),
            Item::Raw(rule) => fmt::Debug::fmt(rule, f),
        }
    }
}

/// Validator of a compiled rule: raw input in, message out.
pub type CheckFn = Arc<dyn Fn(&Value) -> Option<String> + Send + Sync>;

/// A run of descriptors compiled into one validator.
#[derive(Clone)]
pub struct CompiledRule {
    schema_type: SchemaType,
    size: usize,
    check: CheckFn,
}

impl CompiledRule {
    fn new<K: SchemaKind>(evaluator: Evaluator<K>, descriptors: Vec<Arc<KindDescriptor<K>>>) -> Self {
        Self {
            schema_type: K::TYPE,
            size: descriptors.len(),
            check: Arc::new(move |input: &Value| evaluator.evaluate(&descriptors, input)),
        }
    }

    /// Type of the schema the rule was compiled from.
    pub fn schema_type(&self) -> SchemaType {
        self.schema_type
    }

    /// Number of descriptors in the group.
    pub fn size(&self) -> usize {
        self.size
    }

    /// Run the group against a raw input.
    pub fn evaluate(&self, input: &Value) -> Option<String> {
        (self.check)(input)
    }

    pub(crate) fn check_fn(&self) -> CheckFn {
        Arc::clone(&self.check)
    }
}

impl fmt::Debug for CompiledRule {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CompiledRule")
            .field("type", &self.schema_type)
            .field("size", &self.size)
            .finish_non_exhaustive()
    }
}

/// Output of the compiler.
#[derive(Debug, Clone)]
pub enum Rule {
    /// A group of engine descriptors.
    Compiled(CompiledRule),
    /// A raw rule, unchanged.
    Raw(FormRule),
}

/// Comparable outline of a [`Rule`], without its closures.
#[derive(Debug, Clone, PartialEq)]
pub enum RuleShape {
    /// A compiled group.
    Compiled {
        /// Schema type.
        schema_type: SchemaType,
        /// Descriptors in the group.
        size: usize,
    },
    /// A raw rule's declarative fields.
    Raw(RuleMeta),
}

impl Rule {
    /// Outline used to compare rule lists.
    pub fn shape(&self) -> RuleShape {
        match self {
            Rule::Compiled(rule) => RuleShape::Compiled {
                schema_type: rule.schema_type,
                size: rule.size,
            },
            Rule::Raw(rule) => RuleShape::Raw(rule.meta()),
        }
    }

    /// Whether this is a compiled group.
    pub fn is_compiled(&self) -> bool {
        matches!(self, Rule::Compiled(_))
    }
}

pub(crate) enum Group<'a, K: SchemaKind> {
    Descriptors(Vec<Arc<KindDescriptor<K>>>),
    Raw(&'a FormRule),
}

pub(crate) fn group<K: SchemaKind>(items: &[Item<K>]) -> Vec<Group<'_, K>> {
    let mut groups = Vec::new();
    let mut open = Vec::new();
    for item in items {
        match item {
            Item::Descriptor(descriptor) => open.push(Arc::clone(descriptor)),
            Item::Raw(rule) => {
                if !open.is_empty() {
                    groups.push(Group::Descriptors(std::mem::take(&mut open)));
                }
                groups.push(Group::Raw(rule));
            }
        }
    }
    if !open.is_empty() {
        groups.push(Group::Descriptors(open));
    }
    groups
}

/// Compile `items` into rules that evaluate with `evaluator`.
pub fn compile<K: SchemaKind>(items: &[Item<K>], evaluator: &Evaluator<K>) -> Vec<Rule> {
    let rules: Vec<Rule> = group(items)
        .into_iter()
        .map(|group| match group {
            Group::Descriptors(descriptors) => {
                Rule::Compiled(CompiledRule::new(evaluator.clone(), descriptors))
            }
            Group::Raw(rule) => Rule::Raw(rule.clone()),
        })
        .collect();
    tracing::debug!(
        schema = %K::TYPE,
        items = items.len(),
        rules = rules.len(),
        "compiled rule groups"
    );
    rules
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::descriptor::Descriptor;
    use crate::string::{StringConstraint, StringKind};
    use serde_json::json;
    use valr_core::Messages;

    fn desc(n: usize) -> Item<StringKind> {
        Item::Descriptor(Arc::new(Descriptor::Check {
            constraint: StringConstraint::Min(n),
            message: None,
        }))
    }

    fn raw(message: &str) -> Item<StringKind> {
        Item::Raw(FormRule::required(message))
    }

    fn evaluator() -> Evaluator<StringKind> {
        Evaluator::new(Messages::defaults(), None)
    }

    #[test]
    fn raw_rule_splits_groups() {
        let items = vec![desc(1), desc(2), raw("r"), desc(3)];
        let shapes: Vec<_> = compile(&items, &evaluator()).iter().map(Rule::shape).collect();
        assert_eq!(
            shapes,
            vec![
                RuleShape::Compiled { schema_type: SchemaType::String, size: 2 },
                RuleShape::Raw(FormRule::required("r").meta()),
                RuleShape::Compiled { schema_type: SchemaType::String, size: 1 },
            ]
        );
    }

    #[test]
    fn descriptors_only_yield_one_rule() {
        let items = vec![desc(1), desc(2), desc(3)];
        let rules = compile(&items, &evaluator());
        assert_eq!(rules.len(), 1);
        assert!(rules[0].is_compiled());
    }

    #[test]
    fn empty_items_yield_no_rules() {
        assert!(compile::<StringKind>(&[], &evaluator()).is_empty());
    }

    #[test]
    fn adjacent_raw_rules_stay_separate() {
        let items = vec![raw("a"), raw("b")];
        let rules = compile(&items, &evaluator());
        assert_eq!(rules.len(), 2);
        assert!(rules.iter().all(|rule| !rule.is_compiled()));
    }

    #[test]
    fn compiled_group_evaluates_in_order() {
        let items = vec![desc(2), desc(4)];
        let rules = compile(&items, &evaluator());
        let Rule::Compiled(rule) = &rules[0] else {
            panic!("expected a compiled rule");
        };
        assert_eq!(rule.evaluate(&json!("a")).as_deref(), Some("字符串长度最小值为 2"));
        assert_eq!(rule.evaluate(&json!("abc")).as_deref(), Some("字符串长度最小值为 4"));
        assert_eq!(rule.evaluate(&json!("abcd")), None);
    }
}

#[cfg(test)]
mod proptests {
    use super::*;
    use crate::descriptor::Descriptor;
    use crate::string::{StringConstraint, StringKind};
    use proptest::prelude::*;
    use valr_core::Messages;

    fn items_from(layout: &[bool]) -> Vec<Item<StringKind>> {
        layout
            .iter()
            .enumerate()
            .map(|(i, is_descriptor)| {
                if *is_descriptor {
                    Item::Descriptor(Arc::new(Descriptor::Check {
                        constraint: StringConstraint::Min(i),
                        message: None,
                    }))
                } else {
                    Item::Raw(FormRule::required(format!("raw-{i}")))
                }
            })
            .collect()
    }

    /// Run-length encoding: `Some(n)` for a run of `n` descriptors, `None`
    /// for a raw rule.
    fn expected_layout(layout: &[bool]) -> Vec<Option<usize>> {
        let mut out = Vec::new();
        let mut run = 0;
        for is_descriptor in layout {
            if *is_descriptor {
                run += 1;
            } else {
                if run > 0 {
                    out.push(Some(run));
                    run = 0;
                }
                out.push(None);
            }
        }
        if run > 0 {
            out.push(Some(run));
        }
        out
    }

    proptest! {
        #[test]
        fn grouping_preserves_order(layout in proptest::collection::vec(any::<bool>(), 0..24)) {
            let items = items_from(&layout);
            let rules = compile(&items, &Evaluator::new(Messages::defaults(), None));
            let actual: Vec<Option<usize>> = rules
                .iter()
                .map(|rule| match rule {
                    Rule::Compiled(compiled) => Some(compiled.size()),
                    Rule::Raw(_) => None,
                })
                .collect();
            prop_assert_eq!(actual, expected_layout(&layout));

            let raw_messages: Vec<_> = rules
                .iter()
                .filter_map(|rule| match rule {
                    Rule::Raw(raw) => raw.message.clone(),
                    Rule::Compiled(_) => None,
                })
                .collect();
            let expected_messages: Vec<_> = layout
                .iter()
                .enumerate()
                .filter(|(_, is_descriptor)| !**is_descriptor)
                .map(|(i, _)| format!("raw-{i}"))
                .collect();
            prop_assert_eq!(raw_messages, expected_messages);
        }

        #[test]
        fn compiling_twice_is_idempotent(layout in proptest::collection::vec(any::<bool>(), 0..16)) {
            let items = items_from(&layout);
            let evaluator = Evaluator::new(Messages::defaults(), None);
            let first: Vec<_> = compile(&items, &evaluator).iter().map(Rule::shape).collect();
            let second: Vec<_> = compile(&items, &evaluator).iter().map(Rule::shape).collect();
            prop_assert_eq!(first, second);
        }
    }
}
