//! CSS cascading: picking the winning declaration per element and property.
//!
//! [CSS Cascading and Inheritance Level 4](https://www.w3.org/TR/css-cascade-4/)
//!
//! Selector matching happens upstream; this module receives declarations
//! already attached to their elements, each carrying the selector's
//! component counts, its origin, importance, and source position. The
//! cascade is then a total order:
//!
//! 1. origin and importance rank (see [`precedence_rank`]),
//! 2. selector specificity, higher wins,
//! 3. source order, later wins.

use std::collections::{HashMap, HashSet};

use crate::style::Property;
use wombat_dom::{DomTree, NodeId, NodeType};

/// Where a declaration came from.
///
/// [§ 6.2 Cascading Origins](https://www.w3.org/TR/css-cascade-4/#cascading-origins)
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Origin {
    /// The engine's built-in defaults.
    UserAgent,
    /// The user's own stylesheet.
    User,
    /// The page author's stylesheets.
    Author,
    /// A `style` attribute on the element itself.
    Inline,
}

/// Selector component counts handed over by the external matcher.
///
/// [§ 6.4.3 Specificity](https://www.w3.org/TR/css-cascade-4/#cascade-specificity)
#[derive(Debug, Clone, Copy, Default)]
pub struct SelectorCounts {
    /// Number of ID selectors.
    pub ids: u32,
    /// Number of class selectors.
    pub classes: u32,
    /// Number of attribute selectors.
    pub attributes: u32,
    /// Number of type (element) selectors.
    pub elements: u32,
    /// Number of pseudo-classes and pseudo-elements.
    pub pseudos: u32,
}

/// Selector specificity as an ordered triple.
///
/// [§ 6.4.3 Specificity](https://www.w3.org/TR/css-cascade-4/#cascade-specificity)
/// "A selector's specificity is calculated for a given element as follows:
/// count the number of ID selectors... count the number of class selectors,
/// attributes selectors, and pseudo-classes... count the number of type
/// selectors and pseudo-elements."
///
/// Compared lexicographically; pseudo-elements and pseudo-classes are
/// counted as normal elements and classes, respectively.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Default)]
pub struct Specificity(pub u32, pub u32, pub u32);

impl Specificity {
    /// Fold the matcher's component counts into the three-tier triple.
    #[must_use]
    pub const fn from_counts(counts: &SelectorCounts) -> Self {
        Self(
            counts.ids,
            counts.classes + counts.attributes,
            counts.elements + counts.pseudos,
        )
    }
}

/// Interaction gate attached to a declaration by the matcher
/// (e.g. from `:hover` in the matched selector).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Condition {
    /// Applies while the pointer is over the element.
    Hover,
    /// Applies while the element is being activated.
    Active,
    /// Applies to links the user has visited.
    Visited,
}

/// Current interaction state of the page, owned by the embedder.
///
/// Changing this invalidates every [`ResolvedStyle`]; call
/// [`resolve_styles`] again with the new state.
#[derive(Debug, Clone, Default)]
pub struct InteractionState {
    /// The element currently under the pointer, if any.
    pub hover: Option<NodeId>,
    /// The element currently being activated, if any.
    pub active: Option<NodeId>,
    /// Elements whose link target has been visited.
    pub visited: HashSet<NodeId>,
}

/// One matched property declaration for one element.
#[derive(Debug, Clone)]
pub struct StyleDeclaration {
    /// The property being set.
    pub property: Property,
    /// The declared value, verbatim.
    pub value: String,
    /// Which stylesheet kind the declaration came from.
    pub origin: Origin,
    /// Whether the declaration carried `!important`.
    pub important: bool,
    /// Specificity of the selector that matched.
    pub specificity: Specificity,
    /// Position of the declaration in the concatenated stylesheet source.
    pub source_order: u32,
    /// Interaction gate, if the selector carried one.
    pub condition: Option<Condition>,
}

impl StyleDeclaration {
    /// Whether this declaration applies to `id` under the given state.
    #[must_use]
    pub fn applies(&self, id: NodeId, state: &InteractionState) -> bool {
        match self.condition {
            None => true,
            Some(Condition::Hover) => state.hover == Some(id),
            Some(Condition::Active) => state.active == Some(id),
            Some(Condition::Visited) => state.visited.contains(&id),
        }
    }

    /// Cascade weight: rank, then specificity, then source order.
    /// The maximum under the derived tuple ordering wins.
    #[must_use]
    pub fn weight(&self) -> (u8, Specificity, u32) {
        (
            precedence_rank(self.origin, self.important),
            self.specificity,
            self.source_order,
        )
    }
}

/// Rank a declaration by origin and importance.
///
/// [§ 6.4.1 Cascade Sorting Order](https://www.w3.org/TR/css-cascade-4/#cascade-sort)
/// In ascending order of precedence:
///
/// 1. user agent declarations
/// 2. user agent important declarations
/// 3. user normal declarations
/// 4. author normal declarations
/// 5. author important declarations
/// 6. user important declarations
/// 7. inline `style` attribute declarations
///
/// Inline declarations outrank every stylesheet origin regardless of
/// importance.
#[must_use]
pub const fn precedence_rank(origin: Origin, important: bool) -> u8 {
    match (origin, important) {
        (Origin::UserAgent, false) => 0,
        (Origin::UserAgent, true) => 1,
        (Origin::User, false) => 2,
        (Origin::Author, false) => 3,
        (Origin::Author, true) => 4,
        (Origin::User, true) => 5,
        (Origin::Inline, _) => 6,
    }
}

/// Declarations attached to elements by the external selector matcher.
#[derive(Default)]
pub struct DeclaredStyles {
    per_node: HashMap<NodeId, Vec<StyleDeclaration>>,
}

impl DeclaredStyles {
    /// Create an empty set.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Attach a declaration to an element.
    pub fn add(&mut self, id: NodeId, declaration: StyleDeclaration) {
        self.per_node.entry(id).or_default().push(declaration);
    }

    /// All declarations attached to an element.
    #[must_use]
    pub fn get(&self, id: NodeId) -> &[StyleDeclaration] {
        self.per_node.get(&id).map_or(&[], Vec::as_slice)
    }
}

/// The cascade winner for each property of one element.
///
/// Immutable once built; rebuilt from the declaration list whenever the
/// interaction state changes.
#[derive(Debug, Clone, Default)]
pub struct ResolvedStyle {
    winners: HashMap<Property, StyleDeclaration>,
}

impl ResolvedStyle {
    /// Run the cascade over one element's declarations.
    #[must_use]
    pub fn resolve(
        declarations: &[StyleDeclaration],
        id: NodeId,
        state: &InteractionState,
    ) -> Self {
        let mut winners: HashMap<Property, StyleDeclaration> = HashMap::new();
        for decl in declarations {
            if !decl.applies(id, state) {
                continue;
            }
            match winners.get(&decl.property) {
                Some(current) if current.weight() >= decl.weight() => {}
                _ => {
                    let _ = winners.insert(decl.property, decl.clone());
                }
            }
        }
        Self { winners }
    }

    /// The winning declared value for a property, if any.
    #[must_use]
    pub fn value(&self, property: Property) -> Option<&str> {
        self.winners.get(&property).map(|d| d.value.as_str())
    }

    /// The winning declaration for a property, if any.
    #[must_use]
    pub fn declaration(&self, property: Property) -> Option<&StyleDeclaration> {
        self.winners.get(&property)
    }
}

/// Run the cascade for every element in the tree.
///
/// Text nodes get no entry; style getters delegate them to their parent
/// element.
#[must_use]
pub fn resolve_styles(
    tree: &DomTree,
    declared: &DeclaredStyles,
    state: &InteractionState,
) -> HashMap<NodeId, ResolvedStyle> {
    let mut resolved = HashMap::new();
    resolve_node(tree, tree.root(), declared, state, &mut resolved);
    resolved
}

fn resolve_node(
    tree: &DomTree,
    id: NodeId,
    declared: &DeclaredStyles,
    state: &InteractionState,
    resolved: &mut HashMap<NodeId, ResolvedStyle>,
) {
    let Some(node) = tree.get(id) else { return };
    if matches!(node.node_type, NodeType::Element(_)) {
        let _ = resolved.insert(id, ResolvedStyle::resolve(declared.get(id), id, state));
    }
    for &child in tree.children(id) {
        resolve_node(tree, child, declared, state, resolved);
    }
}
