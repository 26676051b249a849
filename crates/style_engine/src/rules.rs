//! Style rules, shorthand expansion, and the per-widget style chain.

use selectors::{ElementAdapter, Selector, Specificity, matches_selector};

use crate::value::StyleValue;

/// One `property: value` pair as produced by the stylesheet layer.
#[derive(Clone, Debug, PartialEq)]
pub struct Declaration {
    pub property: String,
    pub value: StyleValue,
}

impl Declaration {
    pub fn new(property: impl Into<String>, value: StyleValue) -> Self {
        Self {
            property: property.into(),
            value,
        }
    }
}

/// A selector plus its declarations. `source_order` is assigned by the
/// owning [`RuleSet`] and used only as the final cascade tie-break.
#[derive(Clone, Debug)]
pub struct Rule {
    pub selector: Selector,
    pub declarations: Vec<Declaration>,
    pub source_order: u32,
}

/// The active rule collection, ordered by declaration order. Shorthand
/// declarations are expanded once, when the rule is inserted; the
/// expanded longhands keep the originating rule's specificity and
/// source order by construction.
#[derive(Debug, Default)]
pub struct RuleSet {
    rules: Vec<Rule>,
    next_order: u32,
}

impl RuleSet {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, selector: Selector, declarations: Vec<Declaration>) {
        let expanded = expand_declarations(declarations);
        self.rules.push(Rule {
            selector,
            declarations: expanded,
            source_order: self.next_order,
        });
        self.next_order += 1;
    }

    pub fn rules(&self) -> &[Rule] {
        &self.rules
    }

    pub fn len(&self) -> usize {
        self.rules.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }
}

const MARGIN_EDGES: [&str; 4] = ["margin-top", "margin-right", "margin-bottom", "margin-left"];
const PADDING_EDGES: [&str; 4] = [
    "padding-top",
    "padding-right",
    "padding-bottom",
    "padding-left",
];
const BORDER_EDGES: [&str; 4] = [
    "border-top-width",
    "border-right-width",
    "border-bottom-width",
    "border-left-width",
];

/// Expand box-edge and border shorthands into their longhands. The
/// `border` shorthand splits by value kind: a number sets the four edge
/// widths, a color sets `border-color`.
fn expand_declarations(declarations: Vec<Declaration>) -> Vec<Declaration> {
    let mut out = Vec::with_capacity(declarations.len());
    for decl in declarations {
        let edges: Option<&[&str; 4]> = match decl.property.as_str() {
            "margin" => Some(&MARGIN_EDGES),
            "padding" => Some(&PADDING_EDGES),
            "border-width" => Some(&BORDER_EDGES),
            "border" => match decl.value {
                StyleValue::Number(_) => Some(&BORDER_EDGES),
                StyleValue::Color(_) => {
                    out.push(Declaration::new("border-color", decl.value));
                    continue;
                }
                _ => None,
            },
            _ => None,
        };
        if let Some(edges) = edges {
            for edge in edges {
                out.push(Declaration::new(*edge, decl.value.clone()));
            }
        } else {
            out.push(decl);
        }
    }
    out
}

/// The ordered sequence of rules matching one widget, sorted ascending
/// by `(specificity, source_order)` so the last entry has the highest
/// priority. Replaced wholesale on every rebuild, never mutated.
#[derive(Clone, Debug, Default)]
pub struct StyleChain {
    entries: Vec<ChainEntry>,
}

#[derive(Clone, Copy, Debug)]
pub struct ChainEntry {
    pub rule_idx: usize,
    pub specificity: Specificity,
    pub source_order: u32,
}

impl StyleChain {
    /// Filter the rule set down to the rules matching `element` and
    /// sort them into cascade order.
    pub fn build<A: ElementAdapter>(rules: &RuleSet, adapter: &A, element: A::Handle) -> Self {
        let mut entries: Vec<ChainEntry> = rules
            .rules()
            .iter()
            .enumerate()
            .filter(|(_, rule)| matches_selector(adapter, element, &rule.selector))
            .map(|(rule_idx, rule)| ChainEntry {
                rule_idx,
                specificity: rule.selector.specificity(),
                source_order: rule.source_order,
            })
            .collect();
        entries.sort_by_key(|entry| (entry.specificity, entry.source_order));
        Self { entries }
    }

    /// Walk from highest priority to lowest and return the first
    /// declared value for `property`. Properties resolve independently:
    /// which rules set other properties has no bearing on this one.
    pub fn resolve<'rules>(
        &self,
        rules: &'rules RuleSet,
        property: &str,
    ) -> Option<&'rules StyleValue> {
        for entry in self.entries.iter().rev() {
            let rule = rules.rules().get(entry.rule_idx)?;
            if let Some(decl) = rule
                .declarations
                .iter()
                .find(|decl| decl.property == property)
            {
                return Some(&decl.value);
            }
        }
        None
    }

    pub fn entries(&self) -> &[ChainEntry] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
