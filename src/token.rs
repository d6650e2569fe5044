macro_rules! define_keywords {
    (
        single {
            $( $single_variant:ident => $single_str:expr ),* $(,)?
        }
        multi {
            $( $multi_variant:ident => $multi_str:expr ),* $(,)?
        }
    ) => {
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
        pub enum KeywordKind {
            $( $single_variant, )*
            $( $multi_variant, )*
        }

        impl KeywordKind {
            pub fn as_str(&self) -> &'static str {
                match self {
                    $( KeywordKind::$single_variant => $single_str, )*
                    $( KeywordKind::$multi_variant => $multi_str, )*
                }
            }
        }

        impl std::fmt::Display for KeywordKind {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                f.write_str(self.as_str())
            }
        }

        impl std::str::FromStr for KeywordKind {
            type Err = ();
            fn from_str(s: &str) -> Result<Self, Self::Err> {
                // Case-insensitive matching for single-word keywords only
                $( if s.eq_ignore_ascii_case($single_str) { return Ok(KeywordKind::$single_variant); } )*
                Err(())
            }
        }

        /// Lookup a single-word keyword (case-insensitive).
        /// Multi-word keywords (ORDER BY, LEFT JOIN, etc.) are NOT returned here.
        pub fn lookup_keyword(word: &str) -> Option<KeywordKind> {
            word.parse().ok()
        }
    };
}

define_keywords! {
    single {
        // Query clauses
        Select => "SELECT",
        From => "FROM",
        Where => "WHERE",
        Having => "HAVING",
        Into => "INTO",
        Values => "VALUES",
        Set => "SET",
        Union => "UNION",
        Minus => "MINUS",
        Intersect => "INTERSECT",
        Except => "EXCEPT",
        For => "FOR",
        Refresh => "REFRESH",
        Limit => "LIMIT",
        Offset => "OFFSET",
        Returning => "RETURNING",
        With => "WITH",

        // Expressions
        And => "AND",
        Or => "OR",
        Not => "NOT",
        In => "IN",
        Exists => "EXISTS",
        Between => "BETWEEN",
        Like => "LIKE",
        Is => "IS",
        Null => "NULL",
        As => "AS",
        On => "ON",
        Join => "JOIN",
        Distinct => "DISTINCT",
        All => "ALL",
        Any => "ANY",
        Asc => "ASC",
        Desc => "DESC",
        Case => "CASE",
        When => "WHEN",
        Then => "THEN",
        Else => "ELSE",
        End => "END",
        Using => "USING",
        Natural => "NATURAL",
        True => "TRUE",
        False => "FALSE",

        // Statements
        Insert => "INSERT",
        Update => "UPDATE",
        Delete => "DELETE",
        Merge => "MERGE",
        Create => "CREATE",
        Alter => "ALTER",
        Drop => "DROP",
        Truncate => "TRUNCATE",
        Grant => "GRANT",
        Revoke => "REVOKE",
        Commit => "COMMIT",
        Rollback => "ROLLBACK",

        // DDL
        Table => "TABLE",
        View => "VIEW",
        Index => "INDEX",
        Materialized => "MATERIALIZED",
        Temporary => "TEMPORARY",
        Unique => "UNIQUE",
        Replace => "REPLACE",
        Constraint => "CONSTRAINT",
        References => "REFERENCES",
        Default => "DEFAULT",
        Check => "CHECK",
        Cascade => "CASCADE",

        // Standalone single-word variants (for lexer lookahead)
        Order => "ORDER",
        Group => "GROUP",
        Left => "LEFT",
        Right => "RIGHT",
        Inner => "INNER",
        Outer => "OUTER",
        Full => "FULL",
        Cross => "CROSS",
        Primary => "PRIMARY",
        Foreign => "FOREIGN",
        If => "IF",
    }
    multi {
        OrderBy => "ORDER BY",
        GroupBy => "GROUP BY",
        UnionAll => "UNION ALL",
        LeftJoin => "LEFT JOIN",
        LeftOuterJoin => "LEFT OUTER JOIN",
        RightJoin => "RIGHT JOIN",
        RightOuterJoin => "RIGHT OUTER JOIN",
        FullJoin => "FULL JOIN",
        FullOuterJoin => "FULL OUTER JOIN",
        InnerJoin => "INNER JOIN",
        OuterJoin => "OUTER JOIN",
        CrossJoin => "CROSS JOIN",
        PrimaryKey => "PRIMARY KEY",
        ForeignKey => "FOREIGN KEY",
        IfExists => "IF EXISTS",
        IfNotExists => "IF NOT EXISTS",
    }
}

// ── Layout tables ───────────────────────────────────────────────────

/// Keywords that always start a new line when they open a clause.
pub const BREAK_BEFORE: &[KeywordKind] = &[
    KeywordKind::Select,
    KeywordKind::From,
    KeywordKind::Where,
    KeywordKind::OrderBy,
    KeywordKind::GroupBy,
    KeywordKind::Having,
    KeywordKind::Values,
    KeywordKind::Union,
    KeywordKind::UnionAll,
    KeywordKind::Minus,
    KeywordKind::Intersect,
    KeywordKind::Except,
    KeywordKind::As,
    KeywordKind::For,
    KeywordKind::Set,
    KeywordKind::Refresh,
];

/// Keywords followed by a line break.
pub const BREAK_AFTER: &[KeywordKind] = &[KeywordKind::As, KeywordKind::For, KeywordKind::Join];

/// Keywords after which `(` opens a subquery or value list instead of a grouping.
pub const SUBSELECT_INTRODUCERS: &[KeywordKind] = &[KeywordKind::In, KeywordKind::Exists];

pub const SELECT_TERMINAL: &[KeywordKind] = &[
    KeywordKind::From,
    KeywordKind::Into,
    KeywordKind::Where,
    KeywordKind::GroupBy,
    KeywordKind::OrderBy,
    KeywordKind::Having,
    KeywordKind::Union,
    KeywordKind::UnionAll,
    KeywordKind::Minus,
    KeywordKind::Intersect,
    KeywordKind::Except,
];

pub const SET_TERMINAL: &[KeywordKind] = &[
    KeywordKind::From,
    KeywordKind::Where,
    KeywordKind::Returning,
];

pub const GROUP_BY_TERMINAL: &[KeywordKind] = &[
    KeywordKind::OrderBy,
    KeywordKind::Having,
    KeywordKind::Union,
    KeywordKind::UnionAll,
    KeywordKind::Minus,
    KeywordKind::Intersect,
    KeywordKind::Except,
    KeywordKind::For,
];

pub const WHERE_TERMINAL: &[KeywordKind] = &[
    KeywordKind::OrderBy,
    KeywordKind::GroupBy,
    KeywordKind::Having,
    KeywordKind::Union,
    KeywordKind::UnionAll,
    KeywordKind::Minus,
    KeywordKind::Intersect,
    KeywordKind::Except,
    KeywordKind::For,
];

pub const FROM_TERMINAL: &[KeywordKind] = &[
    KeywordKind::Where,
    KeywordKind::OrderBy,
    KeywordKind::GroupBy,
    KeywordKind::Having,
    KeywordKind::Union,
    KeywordKind::UnionAll,
    KeywordKind::Minus,
    KeywordKind::Intersect,
    KeywordKind::Except,
    KeywordKind::For,
];

impl KeywordKind {
    pub fn breaks_before(&self) -> bool {
        BREAK_BEFORE.contains(self)
    }

    pub fn breaks_after(&self) -> bool {
        BREAK_AFTER.contains(self)
    }

    pub fn introduces_subselect(&self) -> bool {
        SUBSELECT_INTRODUCERS.contains(self)
    }

    /// Keywords that double as function names, as in `LEFT(name, 3)`.
    pub fn is_callable(&self) -> bool {
        matches!(
            self,
            KeywordKind::Left | KeywordKind::Right | KeywordKind::Replace | KeywordKind::If
        )
    }

    pub fn is_join_keyword(&self) -> bool {
        matches!(
            self,
            KeywordKind::Join
                | KeywordKind::LeftJoin
                | KeywordKind::LeftOuterJoin
                | KeywordKind::RightJoin
                | KeywordKind::RightOuterJoin
                | KeywordKind::FullJoin
                | KeywordKind::FullOuterJoin
                | KeywordKind::InnerJoin
                | KeywordKind::OuterJoin
                | KeywordKind::CrossJoin
        )
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Token<'a> {
    Keyword(KeywordKind),
    Identifier(&'a str),
    /// Raw text including the surrounding quotes or backticks.
    QuotedIdentifier(&'a str),
    /// Raw text including the surrounding single quotes.
    StringLiteral(&'a str),
    NumberLiteral(&'a str),
    Operator(&'a str),
    Comma,
    Semicolon,
    Dot,
    OpenParen,
    CloseParen,
    LineComment(&'a str),
    BlockComment(&'a str),
    Whitespace(&'a str),
}

impl Token<'_> {
    pub fn is_comment(&self) -> bool {
        matches!(self, Token::LineComment(_) | Token::BlockComment(_))
    }

    /// True when the keyword belongs to `set`, or the token is `;`.
    pub fn terminates(&self, set: &[KeywordKind]) -> bool {
        match self {
            Token::Keyword(kw) => set.contains(kw),
            Token::Semicolon => true,
            _ => false,
        }
    }
}
