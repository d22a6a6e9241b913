//! Tagged-union AST consumed by the usage scanner.
//!
//! The scanner never parses: an external parser collaborator produces this
//! tree and hands it over inside a [`crate::sema::Document`]. Only the node
//! kinds that can introduce or reference a name are modeled precisely;
//! everything else travels through the generic `Expression`/`Block`
//! containers.
//!
//! Name-bearing leaves refer to tokens by index into the document's token
//! table, so a node carries no text of its own.

/// One AST node.
#[derive(Clone, Debug, PartialEq)]
pub enum AstNode {
    /// The root of a translation unit.
    TranslationUnit { decls: Vec<AstNode> },
    /// A plain identifier, e.g. `size`.
    SimpleName { token: usize },
    /// A destructor name, e.g. `~Buffer`. The token is the identifier after
    /// the `~`.
    DestructorName { token: usize },
    /// A template-id, e.g. `vector<int>`. The token is the base identifier;
    /// the argument subtrees are still visited by the scanner.
    TemplateIdName { token: usize, args: Vec<AstNode> },
    /// A qualified-name chain, e.g. `N::C::m`. Parts are `SimpleName`,
    /// `TemplateIdName` or `DestructorName` nodes in source order; the last
    /// part is the terminal unqualified name.
    QualifiedName { parts: Vec<AstNode>, global: bool },
    /// A member access, `base.member` or `base->member`.
    MemberAccess {
        base: Box<AstNode>,
        member: Box<AstNode>,
        arrow: bool,
    },
    /// A declarator inside a simple-declaration.
    Declarator {
        name: Box<AstNode>,
        initializer: Option<Box<AstNode>>,
    },
    /// A simple-declaration: decl-specifiers followed by declarators.
    SimpleDeclaration {
        specifiers: Vec<AstNode>,
        declarators: Vec<AstNode>,
    },
    /// An enumerator inside an enum body.
    Enumerator {
        token: usize,
        value: Option<Box<AstNode>>,
    },
    /// An Objective-C selector; each segment has its own identifier token.
    ObjcSelector { tokens: Vec<usize> },
    /// A `Q_PROPERTY(...)`-style declaration. The subtree is suppressed by
    /// the scanner.
    QtProperty { tokens: Vec<usize> },
    /// A generic expression container.
    Expression { children: Vec<AstNode> },
    /// A braced statement block.
    Block { statements: Vec<AstNode> },
}

impl AstNode {
    /// Child nodes in source order.
    pub fn children(&self) -> Vec<&AstNode> {
        match self {
            AstNode::TranslationUnit { decls } => decls.iter().collect(),
            AstNode::SimpleName { .. }
            | AstNode::DestructorName { .. }
            | AstNode::Enumerator { value: None, .. }
            | AstNode::ObjcSelector { .. }
            | AstNode::QtProperty { .. } => Vec::new(),
            AstNode::TemplateIdName { args, .. } => args.iter().collect(),
            AstNode::QualifiedName { parts, .. } => parts.iter().collect(),
            AstNode::MemberAccess { base, member, .. } => vec![base, member],
            AstNode::Declarator { name, initializer } => {
                let mut out: Vec<&AstNode> = vec![name];
                if let Some(init) = initializer {
                    out.push(init);
                }
                out
            }
            AstNode::SimpleDeclaration {
                specifiers,
                declarators,
            } => specifiers.iter().chain(declarators.iter()).collect(),
            AstNode::Enumerator {
                value: Some(value), ..
            } => vec![value],
            AstNode::Expression { children } => children.iter().collect(),
            AstNode::Block { statements } => statements.iter().collect(),
        }
    }

    /// The smallest token index in this subtree.
    pub fn first_token(&self) -> Option<usize> {
        self.own_tokens()
            .into_iter()
            .chain(self.children().into_iter().filter_map(AstNode::first_token))
            .min()
    }

    /// The largest token index in this subtree.
    pub fn last_token(&self) -> Option<usize> {
        self.own_tokens()
            .into_iter()
            .chain(self.children().into_iter().filter_map(AstNode::last_token))
            .max()
    }

    fn own_tokens(&self) -> Vec<usize> {
        match self {
            AstNode::SimpleName { token }
            | AstNode::DestructorName { token }
            | AstNode::TemplateIdName { token, .. }
            | AstNode::Enumerator { token, .. } => vec![*token],
            AstNode::ObjcSelector { tokens } | AstNode::QtProperty { tokens } => tokens.clone(),
            _ => Vec::new(),
        }
    }
}
