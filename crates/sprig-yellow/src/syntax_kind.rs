use std::fmt;

#[allow(non_camel_case_types)]
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq, PartialOrd, Ord)]
#[repr(u16)]
pub enum SyntaxKind {
    LEFT_PAREN,
    RIGHT_PAREN,
    LEFT_BRACE,
    RIGHT_BRACE,
    COMMA,
    SEMICOLON,
    EQ,
    PLUS,
    MINUS,
    STAR,
    SLASH,
    PERCENT,
    BANG,
    TILDE,
    CARET,
    AMP,
    PIPE,
    AMP_AMP,
    PIPE_PIPE,
    EQ_EQ,
    BANG_EQ,
    LT,
    LT_EQ,
    GT,
    GT_EQ,

    VAR_KW,
    FN_KW,
    IF_KW,
    ELSE_KW,
    WHILE_KW,
    RETURN_KW,
    TRUE_KW,
    FALSE_KW,

    NAME,
    NUMBER,
    STRING,

    BAD_TOKEN,
    EOF,

    WHITESPACE,
    NEWLINE,
    LINE_COMMENT,
    BLOCK_COMMENT,
    SKIPPED_TOKENS_TRIVIA,

    LIST,
    COMPILATION_UNIT,
    BLOCK,
    VARIABLE_DECL,
    FUNCTION_DECL,
    PARAMETER_LIST,
    PARAMETER,
    IF_STMT,
    ELSE_CLAUSE,
    WHILE_STMT,
    RETURN_STMT,
    EXPR_STMT,
    LITERAL_EXPR,
    NAME_EXPR,
    PAREN_EXPR,
    UNARY_EXPR,
    BINARY_EXPR,
    ASSIGN_EXPR,
    CALL_EXPR,
    ARG_LIST,
}

impl SyntaxKind {
    /// Returns `true` for kinds produced by the lexer as tokens.
    #[inline]
    pub fn is_token(self) -> bool {
        self <= Self::EOF
    }

    #[inline]
    pub fn is_trivia(self) -> bool {
        matches!(
            self,
            Self::WHITESPACE
                | Self::NEWLINE
                | Self::LINE_COMMENT
                | Self::BLOCK_COMMENT
                | Self::SKIPPED_TOKENS_TRIVIA
        )
    }

    #[inline]
    pub fn is_keyword(self) -> bool {
        (Self::VAR_KW..=Self::FALSE_KW).contains(&self)
    }

    #[inline]
    pub fn is_list(self) -> bool {
        self == Self::LIST
    }

    pub fn from_keyword(text: &str) -> Option<Self> {
        let kind = match text {
            "var" => Self::VAR_KW,
            "fn" => Self::FN_KW,
            "if" => Self::IF_KW,
            "else" => Self::ELSE_KW,
            "while" => Self::WHILE_KW,
            "return" => Self::RETURN_KW,
            "true" => Self::TRUE_KW,
            "false" => Self::FALSE_KW,
            _ => return None,
        };
        Some(kind)
    }

    /// The text every token of this kind has, if it is fixed.
    pub fn fixed_text(self) -> Option<&'static str> {
        let text = match self {
            Self::LEFT_PAREN => "(",
            Self::RIGHT_PAREN => ")",
            Self::LEFT_BRACE => "{",
            Self::RIGHT_BRACE => "}",
            Self::COMMA => ",",
            Self::SEMICOLON => ";",
            Self::EQ => "=",
            Self::PLUS => "+",
            Self::MINUS => "-",
            Self::STAR => "*",
            Self::SLASH => "/",
            Self::PERCENT => "%",
            Self::BANG => "!",
            Self::TILDE => "~",
            Self::CARET => "^",
            Self::AMP => "&",
            Self::PIPE => "|",
            Self::AMP_AMP => "&&",
            Self::PIPE_PIPE => "||",
            Self::EQ_EQ => "==",
            Self::BANG_EQ => "!=",
            Self::LT => "<",
            Self::LT_EQ => "<=",
            Self::GT => ">",
            Self::GT_EQ => ">=",
            Self::VAR_KW => "var",
            Self::FN_KW => "fn",
            Self::IF_KW => "if",
            Self::ELSE_KW => "else",
            Self::WHILE_KW => "while",
            Self::RETURN_KW => "return",
            Self::TRUE_KW => "true",
            Self::FALSE_KW => "false",
            _ => return None,
        };
        Some(text)
    }

    /// Human readable description used in diagnostics.
    pub fn description(self) -> DescribeKind {
        DescribeKind(self)
    }
}

pub struct DescribeKind(SyntaxKind);

impl fmt::Display for DescribeKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let kind = self.0;

        if let Some(text) = kind.fixed_text() {
            return if kind.is_keyword() {
                write!(f, "keyword '{text}'")
            } else {
                write!(f, "'{text}'")
            };
        }

        f.write_str(match kind {
            SyntaxKind::NAME => "identifier",
            SyntaxKind::NUMBER => "numeric literal",
            SyntaxKind::STRING => "string literal",
            SyntaxKind::BAD_TOKEN => "bad token",
            SyntaxKind::EOF => "end of file",
            SyntaxKind::PARAMETER => "parameter",
            SyntaxKind::BLOCK => "block",
            kind if kind.is_trivia() => "trivia",
            kind if kind.to_string().ends_with("_STMT") => "statement",
            _ => "expression",
        })
    }
}

impl fmt::Display for SyntaxKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Debug::fmt(self, f)
    }
}
