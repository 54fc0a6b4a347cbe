use crate::eval::EvalError;

/// Token represents any valid token in the grammar.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Token {
    // Binary operators
    Operator(char),

    // Structural tokens
    IntLiteral(i64),
    LParen,
    RParen,
}

impl core::fmt::Display for Token {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Token::Operator(op) => write!(f, "{}", op),
            Token::IntLiteral(val) => write!(f, "{}", val),
            Token::LParen => write!(f, "("),
            Token::RParen => write!(f, ")"),
        }
    }
}

/// Controls how non-numeric tokens that are longer than a single character
/// are classified.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OperatorMode {
    /// Multi-character tokens are truncated to their first character, so `**`
    /// is read as `*`.
    Lenient,
    /// Multi-character tokens are rejected as unknown operators.
    Strict,
}

impl Default for OperatorMode {
    fn default() -> Self {
        Self::Lenient
    }
}

impl core::str::FromStr for OperatorMode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "lenient" => Ok(Self::Lenient),
            "strict" => Ok(Self::Strict),
            other => Err(format!("unknown operator mode: {}", other)),
        }
    }
}

fn classify(raw: &str, mode: OperatorMode) -> Result<Token, EvalError> {
    if let Ok(val) = raw.parse::<i64>() {
        return Ok(Token::IntLiteral(val));
    }

    let mut chars = raw.chars();
    // split_whitespace never yields an empty substring.
    let first = chars.next().unwrap_or_default();
    let truncated = chars.next().is_some();

    match (first, truncated, mode) {
        (')', false, _) => Ok(Token::RParen),
        ('(', false, _) => Ok(Token::LParen),
        (_, true, OperatorMode::Strict) => Err(EvalError::UnknownOperator(raw.to_string())),
        (op, _, _) => Ok(Token::Operator(op)),
    }
}

/// Scanner splits a single input line on runs of whitespace and classifies
/// each raw substring into a Token.
pub struct Scanner<'a> {
    source: core::str::SplitWhitespace<'a>,
    mode: OperatorMode,
}

impl<'a> Scanner<'a> {
    pub fn new(source: &'a str) -> Scanner<'a> {
        Scanner {
            source: source.split_whitespace(),
            mode: OperatorMode::default(),
        }
    }

    pub fn with_mode(mut self, mode: OperatorMode) -> Self {
        self.mode = mode;
        self
    }
}

impl<'a> Iterator for Scanner<'a> {
    type Item = Result<Token, EvalError>;

    fn next(&mut self) -> Option<Self::Item> {
        let mode = self.mode;
        self.source.next().map(|raw| classify(raw, mode))
    }
}
