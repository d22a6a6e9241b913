//! Parsed-document and snapshot contracts.
//!
//! A [`Document`] is the read-only view of one parsed translation unit:
//! source text, token table, AST root and symbol table. A [`Snapshot`] is
//! the set of all currently parsed documents, used for cross-file lookup
//! (reopened namespaces, cross-file base classes).
//!
//! The engine only reads these. The construction API (`add_token`,
//! `table_mut`, `set_translation_unit`) belongs to the external
//! parser/binder; a snapshot manager republishes a fresh `Arc<Document>` on
//! reparse instead of mutating in place, which is what makes concurrent
//! scans across files sound.

use std::ops::Range;
use std::sync::Arc;

use indexmap::IndexMap;

use crate::ast::AstNode;
use crate::base::{Ident, Interner, LineCol, LineIndex, TextRange};
use crate::sema::symbols::{SymbolId, SymbolRef, SymbolTable};
use crate::sema::types::Type;

/// One token of a document.
#[derive(Clone, Debug)]
pub struct Token {
    /// Interned identifier text, for identifier tokens only.
    pub ident: Option<Ident>,
    /// Byte range in the source text.
    pub range: TextRange,
}

/// A parsed translation unit.
#[derive(Debug)]
pub struct Document {
    file_name: Arc<str>,
    source: Arc<str>,
    line_index: LineIndex,
    interner: Arc<Interner>,
    tokens: Vec<Token>,
    translation_unit: Option<AstNode>,
    table: SymbolTable,
}

impl Document {
    /// Create an empty document sharing the snapshot-wide interner.
    pub fn new(
        file_name: impl Into<Arc<str>>,
        source: impl Into<Arc<str>>,
        interner: Arc<Interner>,
    ) -> Self {
        let file_name = file_name.into();
        let source = source.into();
        let line_index = LineIndex::new(&source);
        let table = SymbolTable::new(file_name.clone());
        Self {
            file_name,
            source,
            line_index,
            interner,
            tokens: Vec::new(),
            translation_unit: None,
            table,
        }
    }

    pub fn file_name(&self) -> &Arc<str> {
        &self.file_name
    }

    pub fn source(&self) -> &str {
        &self.source
    }

    pub fn interner(&self) -> &Arc<Interner> {
        &self.interner
    }

    pub fn table(&self) -> &SymbolTable {
        &self.table
    }

    /// Mutable symbol table, for the binder while the document is built.
    pub fn table_mut(&mut self) -> &mut SymbolTable {
        &mut self.table
    }

    /// The root symbol (global namespace) as a [`SymbolRef`].
    pub fn root_ref(&self) -> SymbolRef<'_> {
        SymbolRef::new(&self.table, self.table.root())
    }

    /// Append a token covering `range`. Identifier tokens get their text
    /// interned so the scanner can compare them as handles.
    pub fn add_token(&mut self, range: TextRange) -> usize {
        let text = &self.source[Range::<usize>::from(range)];
        let ident = is_identifier(text).then(|| self.interner.intern(text));
        self.tokens.push(Token { ident, range });
        self.tokens.len() - 1
    }

    /// Install the AST root.
    pub fn set_translation_unit(&mut self, root: AstNode) {
        self.translation_unit = Some(root);
    }

    pub fn translation_unit(&self) -> Option<&AstNode> {
        self.translation_unit.as_ref()
    }

    pub fn token(&self, index: usize) -> Option<&Token> {
        self.tokens.get(index)
    }

    /// Interned identifier of a token, `None` for non-identifier tokens.
    pub fn token_ident(&self, index: usize) -> Option<Ident> {
        self.tokens.get(index)?.ident
    }

    /// Source text of a token.
    pub fn token_text(&self, index: usize) -> Option<&str> {
        let range = self.tokens.get(index)?.range;
        Some(&self.source[Range::<usize>::from(range)])
    }

    /// Byte span of a token.
    pub fn token_span(&self, index: usize) -> Option<TextRange> {
        Some(self.tokens.get(index)?.range)
    }

    /// Line/column of a token's first byte (0-indexed).
    pub fn token_start_position(&self, index: usize) -> Option<LineCol> {
        let range = self.tokens.get(index)?.range;
        Some(self.line_index.line_col(range.start()))
    }

    pub fn token_count(&self) -> usize {
        self.tokens.len()
    }

    /// Full text of one source line, without the trailing newline.
    pub fn line_text(&self, line: u32) -> Option<&str> {
        let start: usize = self.line_index.line_start(line)?.into();
        let rest = &self.source[start..];
        Some(rest.split_terminator('\n').next().unwrap_or(rest))
    }

    /// The innermost scoped declaration whose extent contains the position.
    ///
    /// The global namespace spans the whole file, so a well-formed document
    /// always yields at least the root. Deeper symbols win; among siblings
    /// the later start wins.
    pub fn find_symbol_at(&self, line: u32, col: u32) -> Option<SymbolId> {
        let pos = LineCol::new(line, col);
        self.table
            .iter()
            .filter(|(_, sym)| sym.is_scoped() && sym.start <= pos && pos <= sym.end)
            .max_by_key(|&(id, sym)| (self.table.ancestors(id).count(), sym.start))
            .map(|(id, _)| id)
    }

    /// Source text covering a whole subtree, for the type-of-expression
    /// collaborator.
    pub fn text_of(&self, node: &AstNode) -> Option<&str> {
        let first = self.token_span(node.first_token()?)?;
        let last = self.token_span(node.last_token()?)?;
        Some(&self.source[usize::from(first.start())..usize::from(last.end())])
    }
}

fn is_identifier(text: &str) -> bool {
    let mut chars = text.chars();
    match chars.next() {
        Some(c) if unicode_ident::is_xid_start(c) || c == '_' => {}
        _ => return false,
    }
    chars.all(|c| unicode_ident::is_xid_continue(c) || c == '_')
}

/// The set of all currently parsed documents, keyed by file name.
///
/// Insertion order is preserved, which keeps cross-file candidate order (and
/// therefore usage lists) deterministic.
#[derive(Debug)]
pub struct Snapshot {
    interner: Arc<Interner>,
    documents: IndexMap<Arc<str>, Arc<Document>>,
}

impl Snapshot {
    /// Create an empty snapshot with a fresh shared interner.
    pub fn new() -> Self {
        Self::with_interner(Arc::new(Interner::new()))
    }

    /// Create an empty snapshot around an existing interner.
    pub fn with_interner(interner: Arc<Interner>) -> Self {
        Self {
            interner,
            documents: IndexMap::new(),
        }
    }

    pub fn interner(&self) -> &Arc<Interner> {
        &self.interner
    }

    /// Publish a document, replacing any previous version of the same file.
    pub fn insert(&mut self, document: Document) -> Arc<Document> {
        let doc = Arc::new(document);
        self.documents.insert(doc.file_name().clone(), doc.clone());
        doc
    }

    /// Look up a document by file name.
    pub fn document(&self, file_name: &str) -> Option<&Arc<Document>> {
        self.documents.get(file_name)
    }

    /// Iterate all documents in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = &Arc<Document>> {
        self.documents.values()
    }

    pub fn len(&self) -> usize {
        self.documents.len()
    }

    pub fn is_empty(&self) -> bool {
        self.documents.is_empty()
    }
}

impl Default for Snapshot {
    fn default() -> Self {
        Self::new()
    }
}

/// One answer from the type-of-expression collaborator.
#[derive(Clone, Debug)]
pub struct TypeItem {
    /// The type of the expression.
    pub ty: Type,
    /// The declaring document and symbol, when known. The file name keys
    /// back into the snapshot.
    pub declaration: Option<(Arc<str>, SymbolId)>,
}

/// External collaborator that evaluates the type of an expression.
///
/// Used only for member-access (`a.b`) and qualified-expression resolution;
/// its own algorithm is outside this engine.
pub trait TypeOfExpression: Sync {
    /// Ordered list of possible types for `expression` as seen at `anchor`
    /// in `document`.
    fn type_of(
        &self,
        expression: &str,
        document: &Document,
        anchor: Option<SymbolId>,
    ) -> Vec<TypeItem>;
}

/// A collaborator that knows nothing; member accesses then yield no usages.
#[derive(Debug, Default, Clone, Copy)]
pub struct NullTypeOfExpression;

impl TypeOfExpression for NullTypeOfExpression {
    fn type_of(&self, _: &str, _: &Document, _: Option<SymbolId>) -> Vec<TypeItem> {
        Vec::new()
    }
}
