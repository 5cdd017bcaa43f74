//! 式の定義

use serde::{Deserialize, Serialize};

use super::{Span, VarIdent, VarType};

/// 式
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Expression {
    Literal(LiteralExpr),
    Unary(UnaryExpr),
    Binary(BinaryExpr),
    Ternary(TernaryExpr),
    Assign(AssignExpr),
    Cast(CastExpr),
    Call(FunctionCallExpr),
    VarAccess(VarAccessExpr),
    Initializer(InitializerExpr),
    Bracket(BracketExpr),
    List(ListExpr),
}

impl Expression {
    /// 式全体のスパンを返す
    pub fn span(&self) -> Span {
        match self {
            Expression::Literal(e) => e.span,
            Expression::Unary(e) => e.span,
            Expression::Binary(e) => e.span,
            Expression::Ternary(e) => e.span,
            Expression::Assign(e) => e.span,
            Expression::Cast(e) => e.span,
            Expression::Call(e) => e.span,
            Expression::VarAccess(e) => e.span,
            Expression::Initializer(e) => e.span,
            Expression::Bracket(e) => e.span,
            Expression::List(e) => e.span,
        }
    }
}

/// リテラル値
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Literal {
    Int(i64),
    Float(f64),
    Bool(bool),
    String(String),
}

/// リテラル式
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LiteralExpr {
    pub value: Literal,
    pub span: Span,
}

/// 単項演算子
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum UnaryOp {
    Not,
    BitNot,
    Negate,
    Plus,
    PreInc,
    PreDec,
    PostInc,
    PostDec,
}

/// 単項式
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UnaryExpr {
    pub op: UnaryOp,
    pub expr: Box<Expression>,
    pub span: Span,
}

/// 二項演算子
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum BinaryOp {
    Add,
    Subtract,
    Multiply,
    Divide,
    Modulo,
    Eq,
    Ne,
    Lt,
    Gt,
    Le,
    Ge,
    And,
    Or,
    BitAnd,
    BitOr,
    BitXor,
    Shl,
    Shr,
}

/// 二項式
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BinaryExpr {
    pub left: Box<Expression>,
    pub op: BinaryOp,
    pub right: Box<Expression>,
    pub span: Span,
}

/// 三項式（条件演算子）
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TernaryExpr {
    pub condition: Box<Expression>,
    pub then_expr: Box<Expression>,
    pub else_expr: Box<Expression>,
    pub span: Span,
}

/// 代入演算子
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum AssignOp {
    Assign,
    Add,
    Subtract,
    Multiply,
    Divide,
    Modulo,
    Shl,
    Shr,
    BitAnd,
    BitOr,
    BitXor,
}

/// 代入式（右結合）
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AssignExpr {
    pub target: Box<Expression>,
    pub op: AssignOp,
    pub value: Box<Expression>,
    pub span: Span,
}

/// キャスト式
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CastExpr {
    pub target_type: VarType,
    pub expr: Box<Expression>,
    pub span: Span,
}

/// 関数呼び出し式
///
/// 組み込み関数・ユーザー関数・型コンストラクタ（`float3(...)`）を兼ねる。
/// 名前は識別子チェーン（`tex.Sample(...)` のようなメンバー呼び出しを含む）。
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FunctionCallExpr {
    pub name: VarIdent,
    pub args: Vec<Expression>,
    pub span: Span,
}

/// 変数アクセス式（メンバー・配列アクセスの連鎖を含む）
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VarAccessExpr {
    pub ident: VarIdent,
    pub span: Span,
}

/// 初期化子リスト式（`{ 1, 2, 3 }`）
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InitializerExpr {
    pub elements: Vec<Expression>,
    pub span: Span,
}

/// 括弧付き式
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BracketExpr {
    pub expr: Box<Expression>,
    pub span: Span,
}

/// カンマ区切りの式列（許可された文脈のみ）
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ListExpr {
    pub exprs: Vec<Expression>,
    pub span: Span,
}

impl std::fmt::Display for Expression {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Expression::Literal(e) => match &e.value {
                Literal::Int(v) => write!(f, "{}", v),
                Literal::Float(v) => write!(f, "{}", v),
                Literal::Bool(v) => write!(f, "{}", v),
                Literal::String(v) => write!(f, "\"{}\"", v),
            },
            Expression::Unary(e) => write!(f, "({:?} {})", e.op, e.expr),
            Expression::Binary(e) => write!(f, "({} {:?} {})", e.left, e.op, e.right),
            Expression::Ternary(e) => {
                write!(f, "({} ? {} : {})", e.condition, e.then_expr, e.else_expr)
            }
            Expression::Assign(e) => write!(f, "{} = {}", e.target, e.value),
            Expression::Cast(e) => write!(f, "({}){}", e.target_type, e.expr),
            Expression::Call(e) => write!(f, "{}(...)", e.name),
            Expression::VarAccess(e) => write!(f, "{}", e.ident),
            Expression::Initializer(_) => write!(f, "{{ ... }}"),
            Expression::Bracket(e) => write!(f, "({})", e.expr),
            Expression::List(e) => {
                for (i, expr) in e.exprs.iter().enumerate() {
                    if i > 0 {
                        write!(f, ", ")?;
                    }
                    write!(f, "{}", expr)?;
                }
                Ok(())
            }
        }
    }
}
