//! SyntaxKind enum for all tokens and nodes in the template CST.
//!
//! Following the rust-analyzer model, all tokens and nodes share a single enum.
//! Every byte in the source must appear as a token in the tree.

/// All syntax kinds for the template CST.
///
/// This enum represents both tokens (lexer output) and composite nodes (parser output).
/// The `repr(u16)` ensures efficient storage in rowan's green tree.
///
/// We use SCREAMING_CASE following the rust-analyzer convention for SyntaxKind.
#[repr(u16)]
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[allow(non_camel_case_types)]
pub enum SyntaxKind {
    // === Tokens (lexer output) ===
    /// Literal text, including single line endings
    TEXT,
    /// `*` italic delimiter
    STAR,
    /// `**` bold delimiter
    STAR2,
    /// `***` combined bold-italic delimiter
    STAR3,
    /// `~~` strikethrough delimiter
    TILDE2,
    /// Single backtick for code spans
    BACKTICK,
    /// `[` opening a link
    LBRACKET,
    /// `](` closing link text and opening the target
    LINK_MIDDLE,
    /// `)` closing a link target
    RPAREN,
    /// Two or more consecutive line endings
    PARAGRAPH_BREAK,
    /// `%@` sequential placeholder
    PLACEHOLDER,
    /// `%n$@` positional placeholder
    POSITIONAL_PLACEHOLDER,
    /// End of file marker
    EOF,

    // === Composite Nodes (parser output) ===
    /// Root template node
    ROOT,
    /// Paragraph block
    PARAGRAPH,
    /// Bold `**text**`
    BOLD,
    /// Italic `*text*`
    ITALIC,
    /// Strikethrough `~~text~~`
    STRIKETHROUGH,
    /// Inline code span
    CODE,
    /// Link `[text](target)`
    LINK,
    /// Display text of a link
    LINK_TEXT,
    /// Target of a link
    LINK_TARGET,

    /// Delimiter that never found its partner
    UNKNOWN,
}

impl SyntaxKind {
    /// Returns true if this kind represents a token (lexer output).
    pub fn is_token(self) -> bool {
        (self as u16) <= (Self::EOF as u16)
    }

    /// Returns true if this kind represents a composite node.
    pub fn is_node(self) -> bool {
        !self.is_token()
    }

    /// Returns true if this kind is an interpolation placeholder.
    pub fn is_placeholder(self) -> bool {
        matches!(self, Self::PLACEHOLDER | Self::POSITIONAL_PLACEHOLDER)
    }
}

impl From<SyntaxKind> for rowan::SyntaxKind {
    fn from(kind: SyntaxKind) -> Self {
        Self(kind as u16)
    }
}

/// Language definition for rowan.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum TemplateLang {}

impl rowan::Language for TemplateLang {
    type Kind = SyntaxKind;

    fn kind_from_raw(raw: rowan::SyntaxKind) -> Self::Kind {
        assert!(raw.0 <= SyntaxKind::UNKNOWN as u16);
        // SAFETY: We check bounds above and SyntaxKind is repr(u16)
        unsafe { std::mem::transmute::<u16, SyntaxKind>(raw.0) }
    }

    fn kind_to_raw(kind: Self::Kind) -> rowan::SyntaxKind {
        kind.into()
    }
}

/// Type alias for our syntax nodes.
pub type SyntaxNode = rowan::SyntaxNode<TemplateLang>;
/// Type alias for our syntax tokens.
pub type SyntaxToken = rowan::SyntaxToken<TemplateLang>;
/// Type alias for syntax elements (node or token).
pub type SyntaxElement = rowan::SyntaxElement<TemplateLang>;
