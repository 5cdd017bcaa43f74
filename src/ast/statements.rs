//! 文の定義

use serde::{Deserialize, Serialize};

use super::{Expression, Span, VarDecl, VarType};

/// 文
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Statement {
    Comment(CommentStatement),
    Null(NullStatement),
    Directive(DirectiveStatement),
    CodeBlock(CodeBlock),
    For(ForLoopStatement),
    While(WhileLoopStatement),
    DoWhile(DoWhileLoopStatement),
    If(IfStatement),
    Switch(SwitchStatement),
    CtrlTransfer(CtrlTransferStatement),
    VarDecl(VarDeclStatement),
    Return(ReturnStatement),
    Expr(ExprStatement),
}

/// 文の前に置かれる属性（`[unroll]`, `[numthreads(8,8,1)]` など）
///
/// 直後の文にのみ付与され、兄弟の文には決して引き継がれない。
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Attribute {
    pub name: String,
    pub args: Vec<Expression>,
    pub span: Span,
}

/// コメント文（`preserve_comments` 有効時のみ生成される）
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CommentStatement {
    pub text: String,
    pub span: Span,
}

/// 空文（`;` のみ）
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NullStatement {
    pub span: Span,
}

/// ブロック内のプリプロセッサ指令
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DirectiveStatement {
    pub line: String,
    pub span: Span,
}

/// コードブロック
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CodeBlock {
    pub statements: Vec<Statement>,
    pub span: Span,
}

/// for文
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ForLoopStatement {
    pub attribs: Vec<Attribute>,
    pub init: Option<Box<Statement>>,
    pub condition: Option<Expression>,
    pub update: Option<Expression>,
    pub body: Box<Statement>,
    pub span: Span,
}

/// while文
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WhileLoopStatement {
    pub attribs: Vec<Attribute>,
    pub condition: Expression,
    pub body: Box<Statement>,
    pub span: Span,
}

/// do-while文
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DoWhileLoopStatement {
    pub attribs: Vec<Attribute>,
    pub body: Box<Statement>,
    pub condition: Expression,
    pub span: Span,
}

/// if文
///
/// elseブランチは独立したノードとして保持され、このifに連結される。
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct IfStatement {
    pub attribs: Vec<Attribute>,
    pub condition: Expression,
    pub body: Box<Statement>,
    pub else_branch: Option<ElseStatement>,
    pub span: Span,
}

/// else文
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ElseStatement {
    pub body: Box<Statement>,
    pub span: Span,
}

/// switch文
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SwitchStatement {
    pub attribs: Vec<Attribute>,
    pub selector: Expression,
    pub cases: Vec<SwitchCase>,
    pub span: Span,
}

/// switchのケース（`expr`が`None`ならdefault）。各ケースが自身の文リストを持つ
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SwitchCase {
    pub expr: Option<Expression>,
    pub statements: Vec<Statement>,
    pub span: Span,
}

/// 制御移行の種別
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum CtrlTransfer {
    Break,
    Continue,
    Discard,
}

impl std::fmt::Display for CtrlTransfer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            CtrlTransfer::Break => write!(f, "break"),
            CtrlTransfer::Continue => write!(f, "continue"),
            CtrlTransfer::Discard => write!(f, "discard"),
        }
    }
}

/// 制御移行文（break / continue / discard）
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CtrlTransferStatement {
    pub kind: CtrlTransfer,
    pub span: Span,
}

/// 変数宣言文
///
/// `float a = 1, b = 2;` のように1つの型記述子を複数の宣言が共有する。
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VarDeclStatement {
    pub var_type: VarType,
    pub var_decls: Vec<VarDecl>,
    pub span: Span,
}

/// return文
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReturnStatement {
    pub expr: Option<Expression>,
    pub span: Span,
}

/// 式文
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExprStatement {
    pub expr: Expression,
    pub span: Span,
}

impl std::fmt::Display for Statement {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Statement::Comment(s) => write!(f, "/* {} */", s.text),
            Statement::Null(_) => write!(f, ";"),
            Statement::Directive(s) => write!(f, "{}", s.line),
            Statement::CodeBlock(_) => write!(f, "{{ ... }}"),
            Statement::For(_) => write!(f, "for (...) {{ ... }}"),
            Statement::While(_) => write!(f, "while (...) {{ ... }}"),
            Statement::DoWhile(_) => write!(f, "do {{ ... }} while (...);"),
            Statement::If(_) => write!(f, "if (...) {{ ... }}"),
            Statement::Switch(_) => write!(f, "switch (...) {{ ... }}"),
            Statement::CtrlTransfer(s) => write!(f, "{};", s.kind),
            Statement::VarDecl(s) => write!(f, "{} ...;", s.var_type),
            Statement::Return(_) => write!(f, "return ...;"),
            Statement::Expr(s) => write!(f, "{};", s.expr),
        }
    }
}
