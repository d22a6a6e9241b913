//! Find-usages engine.
//!
//! Scans one translation unit's AST for a target declaration and reports
//! every identifier token that canonically denotes it. One depth-first pass
//! per invocation; the scanner mutates only its own accumulators, never the
//! symbol graph, so scans over different documents may run in parallel.
//!
//! Per name node the work is staged cheapest-first: the token's interned
//! identifier is compared against the target's identifier (one u32), and
//! only on a hit is a lookup context built and canonical matching run.

use std::sync::Arc;

use rustc_hash::FxHashSet;
use tracing::debug;

use crate::ast::AstNode;
use crate::base::{Ident, LineCol};
use crate::sema::lookup::LookupContext;
use crate::sema::name::Name;
use crate::sema::snapshot::{Document, Snapshot, TypeOfExpression};
use crate::sema::symbols::{SymbolId, SymbolRef};

/// One recorded occurrence of the target.
///
/// Immutable once produced. Line and column are 0-based; the column points
/// at the identifier token's first byte (for `~Buffer` that is the `B`, not
/// the `~`).
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Usage {
    /// File the usage occurs in.
    pub path: Arc<str>,
    /// Full text of the containing source line.
    pub line_text: String,
    /// 0-based line.
    pub line: u32,
    /// 0-based column of the identifier token.
    pub col: u32,
    /// Length of the matched identifier in bytes.
    pub len: u32,
}

/// Result of one scan: usages plus the parallel raw token indices.
#[derive(Clone, Debug, Default)]
pub struct UsageSearch {
    /// Usages in AST visit order.
    pub usages: Vec<Usage>,
    /// Token index of each usage, parallel to `usages`. Collaborators that
    /// re-enter the AST (e.g. rename) key edits off these.
    pub references: Vec<usize>,
}

/// Scanner configuration, threaded through the entry point explicitly.
#[derive(Clone, Debug, Default)]
pub struct UsageConfig {
    /// Emit a `tracing` debug event for every resolution attempt.
    pub trace_resolution: bool,
}

/// Scan `document` for usages of `target`.
///
/// A target without an identifier (an anonymous entity) yields an empty
/// result: a well-defined no-op, not an error. Repeated scans of the same
/// (document, target, snapshot) tuple return identical lists.
pub fn find_usages(
    document: &Document,
    snapshot: &Snapshot,
    target: SymbolRef<'_>,
    type_of: &dyn TypeOfExpression,
    config: &UsageConfig,
) -> UsageSearch {
    let Some(ident) = target.name().and_then(Name::terminal).and_then(Name::ident) else {
        return UsageSearch::default();
    };
    let Some(text) = snapshot.interner().lookup(ident) else {
        return UsageSearch::default();
    };
    // Intern into the working document's identifier table. The interner is
    // shared snapshot-wide, so this is a handle fetch, not a copy.
    let id = document.interner().intern(&text);

    let Some(root) = document.translation_unit() else {
        return UsageSearch::default();
    };

    let mut scanner = UsageScanner {
        document,
        snapshot,
        target,
        type_of,
        config,
        id,
        processed: FxHashSet::default(),
        anchor_cache: None,
        result: UsageSearch::default(),
    };
    scanner.visit(root);
    scanner.result
}

/// Scan every document of a snapshot for usages of `target`.
///
/// Each per-file scan owns its accumulator and reads only immutable
/// documents, so the scans run in parallel. Results come back in snapshot
/// (insertion) order.
pub fn find_usages_in_snapshot(
    snapshot: &Snapshot,
    target: SymbolRef<'_>,
    type_of: &dyn TypeOfExpression,
    config: &UsageConfig,
) -> Vec<UsageSearch> {
    use rayon::prelude::*;

    let documents: Vec<&Arc<Document>> = snapshot.iter().collect();
    documents
        .par_iter()
        .map(|doc| find_usages(doc, snapshot, target, type_of, config))
        .collect()
}

struct UsageScanner<'a> {
    document: &'a Document,
    snapshot: &'a Snapshot,
    target: SymbolRef<'a>,
    type_of: &'a dyn TypeOfExpression,
    config: &'a UsageConfig,
    /// The target's interned identifier; the cheap-rejection key.
    id: Ident,
    /// Token indices already reported; guarantees at most one usage per
    /// token even when several code paths visit it.
    processed: FxHashSet<usize>,
    /// Last position→anchor answer, reused while visiting a subtree with a
    /// stable innermost scope. An optimization, not a correctness
    /// requirement.
    anchor_cache: Option<(LineCol, Option<SymbolId>)>,
    result: UsageSearch,
}

impl<'a> UsageScanner<'a> {
    fn visit(&mut self, node: &AstNode) {
        match node {
            // Q_PROPERTY-style declarations: the whole subtree is
            // suppressed.
            AstNode::QtProperty { .. } => {}
            AstNode::SimpleName { token } | AstNode::Enumerator { token, .. } => {
                self.check_unqualified(*token, Name::Simple(self.id));
                for child in node.children() {
                    self.visit(child);
                }
            }
            AstNode::DestructorName { token } => {
                self.check_unqualified(*token, Name::Destructor(self.id));
            }
            AstNode::TemplateIdName { token, args } => {
                // Base name checked, argument list still recursed into.
                self.check_unqualified(
                    *token,
                    Name::TemplateId {
                        ident: self.id,
                        args: Vec::new(),
                    },
                );
                for arg in args {
                    self.visit(arg);
                }
            }
            AstNode::QualifiedName { parts, global } => self.check_qualified(parts, *global),
            AstNode::ObjcSelector { tokens } => {
                // Each selector segment carries its own identifier token.
                for &token in tokens {
                    self.check_unqualified(token, Name::Simple(self.id));
                }
            }
            AstNode::MemberAccess { base, member, .. } => {
                self.visit(base);
                self.check_member(base, member);
                // The member's own token is handled above; its template
                // arguments are ordinary subtrees.
                if let AstNode::TemplateIdName { args, .. } = member.as_ref() {
                    for arg in args {
                        self.visit(arg);
                    }
                }
            }
            // Declarator names are visited exactly once through the normal
            // path: a declaration is a usage of itself.
            _ => {
                for child in node.children() {
                    self.visit(child);
                }
            }
        }
    }

    /// Resolve an unqualified name at a token's position and report on a
    /// canonical match.
    fn check_unqualified(&mut self, token: usize, name: Name) {
        if self.document.token_ident(token) != Some(self.id) {
            return;
        }
        let Some(pos) = self.document.token_start_position(token) else {
            return;
        };
        let context = self.context_at(pos);
        let candidates = context.candidates(&name);
        self.check_candidates(token, &candidates);
    }

    /// Each qualified-name segment is checked independently against the
    /// interned identifier; a matching segment resolves the qualifier
    /// prefix up to and including itself.
    fn check_qualified(&mut self, parts: &[AstNode], global: bool) {
        let components: Vec<Option<(usize, Name)>> =
            parts.iter().map(|part| self.part_name(part)).collect();
        let names: Vec<Name> = components
            .iter()
            .filter_map(|c| c.as_ref().map(|(_, name)| name.clone()))
            .collect();
        if names.len() != parts.len() {
            // A malformed chain contributes no usages; scanning continues.
            return;
        }

        for (index, component) in components.iter().enumerate() {
            let Some((token, _)) = component.as_ref() else {
                continue;
            };
            if self.document.token_ident(*token) != Some(self.id) {
                continue;
            }
            let Some(pos) = self.document.token_start_position(*token) else {
                continue;
            };
            let context = self.context_at(pos);
            let candidates = context.candidates_for_prefix(&names, global, index);
            self.check_candidates(*token, &candidates);
        }

        // Template arguments inside qualifier segments are ordinary
        // subtrees.
        for part in parts {
            if let AstNode::TemplateIdName { args, .. } = part {
                for arg in args {
                    self.visit(arg);
                }
            }
        }
    }

    /// Member access: the left operand's type comes from the external
    /// type-of-expression collaborator, then the member name is looked up
    /// inside the declaring symbol's scope.
    fn check_member(&mut self, base: &AstNode, member: &AstNode) {
        let Some((token, name)) = self.part_name(member) else {
            return;
        };
        if self.document.token_ident(token) != Some(self.id) {
            return;
        }
        let Some(expression) = self.document.text_of(base) else {
            return;
        };
        let Some(pos) = self.document.token_start_position(token) else {
            return;
        };
        let anchor = self.anchor_at(pos);
        let items = self.type_of.type_of(expression, self.document, anchor);

        let context = self.context_at(pos);
        let mut candidates = Vec::new();
        for item in &items {
            let Some((file, declaring)) = item.declaration.as_ref() else {
                continue;
            };
            // A stale or missing document yields no candidates from that
            // item; the scan goes on.
            let Some(doc) = self.snapshot.document(file) else {
                continue;
            };
            let class = SymbolRef::new(doc.table(), *declaring);
            if class.table.get(class.id).is_none_or(|sym| !sym.is_scoped()) {
                continue;
            }
            candidates.extend(context.lookup_member(class, &name));
        }
        self.check_candidates(token, &candidates);
    }

    /// The (token, name) of one qualified-name or member component.
    fn part_name(&self, part: &AstNode) -> Option<(usize, Name)> {
        match part {
            AstNode::SimpleName { token } => {
                Some((*token, Name::Simple(self.document.token_ident(*token)?)))
            }
            AstNode::DestructorName { token } => {
                Some((*token, Name::Destructor(self.document.token_ident(*token)?)))
            }
            AstNode::TemplateIdName { token, .. } => Some((
                *token,
                Name::TemplateId {
                    ident: self.document.token_ident(*token)?,
                    args: Vec::new(),
                },
            )),
            _ => None,
        }
    }

    /// A use is reported as soon as any single candidate canonically
    /// matches: a strong result, at most once per token.
    fn check_candidates(&mut self, token: usize, candidates: &[SymbolRef<'_>]) {
        if self.config.trace_resolution {
            debug!(
                token,
                candidates = candidates.len(),
                file = %self.document.file_name(),
                "resolution"
            );
        }
        let matched = candidates
            .iter()
            .any(|candidate| check_symbol(*candidate, self.target));
        if matched {
            self.report(token);
        }
    }

    fn report(&mut self, token: usize) {
        if !self.processed.insert(token) {
            return;
        }
        let Some(pos) = self.document.token_start_position(token) else {
            return;
        };
        let Some(span) = self.document.token_span(token) else {
            return;
        };
        let line_text = self
            .document
            .line_text(pos.line)
            .unwrap_or_default()
            .to_string();
        self.result.usages.push(Usage {
            path: self.document.file_name().clone(),
            line_text,
            line: pos.line,
            col: pos.col,
            len: span.len().into(),
        });
        self.result.references.push(token);
    }

    fn anchor_at(&mut self, pos: LineCol) -> Option<SymbolId> {
        match self.anchor_cache {
            Some((cached, anchor)) if cached == pos => anchor,
            _ => {
                let anchor = self.document.find_symbol_at(pos.line, pos.col);
                self.anchor_cache = Some((pos, anchor));
                anchor
            }
        }
    }

    fn context_at(&mut self, pos: LineCol) -> LookupContext<'a> {
        let anchor = self.anchor_at(pos);
        LookupContext::new(self.document, self.snapshot, anchor)
    }
}

/// Decide whether a resolved candidate denotes the same declaration as the
/// target.
fn check_symbol(candidate: SymbolRef<'_>, target: SymbolRef<'_>) -> bool {
    // Same arena, same handle.
    if candidate.same_symbol(&target) {
        return true;
    }

    // Same declaration reparsed into a different symbol instance.
    let (c, t) = (candidate.symbol(), target.symbol());
    if c.start == t.start && candidate.file_name() == target.file_name() {
        return true;
    }

    // A forward declaration and a definition (or another forward
    // declaration) unify when their enclosing scopes agree. This trades a
    // little precision for not needing full semantic unification.
    let forward_pair = (c.is_forward_class_declaration() && (t.is_class() || t.is_forward_class_declaration()))
        || (t.is_forward_class_declaration() && (c.is_class() || c.is_forward_class_declaration()));
    if forward_pair {
        return check_scope(candidate.enclosing(), target.enclosing());
    }

    false
}

/// Climb both enclosing chains in lockstep. Each level must be the same
/// symbol instance, or carry structurally equal names, or both be unnamed;
/// the chains must reach their roots together.
fn check_scope(a: Option<SymbolRef<'_>>, b: Option<SymbolRef<'_>>) -> bool {
    let (mut a, mut b) = (a, b);
    loop {
        match (a, b) {
            (None, None) => return true,
            (Some(x), Some(y)) => {
                let level_matches = x.same_symbol(&y)
                    || match (x.name(), y.name()) {
                        (Some(nx), Some(ny)) => nx == ny,
                        (None, None) => true,
                        _ => false,
                    };
                if !level_matches {
                    return false;
                }
                a = x.enclosing();
                b = y.enclosing();
            }
            _ => return false,
        }
    }
}
