//! 型記述子と変数宣言の定義

use serde::{Deserialize, Serialize};

use super::{Expression, Span, StructDecl};

/// スカラー基本型
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ScalarType {
    Bool,
    Int,
    UInt,
    DWord,
    Half,
    Float,
    Double,
}

impl std::fmt::Display for ScalarType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ScalarType::Bool => write!(f, "bool"),
            ScalarType::Int => write!(f, "int"),
            ScalarType::UInt => write!(f, "uint"),
            ScalarType::DWord => write!(f, "dword"),
            ScalarType::Half => write!(f, "half"),
            ScalarType::Float => write!(f, "float"),
            ScalarType::Double => write!(f, "double"),
        }
    }
}

/// 組み込みデータ型（スカラー、ベクトル、行列）
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum DataType {
    Scalar(ScalarType),
    Vector(ScalarType, u8),
    Matrix(ScalarType, u8, u8),
}

impl std::fmt::Display for DataType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            DataType::Scalar(s) => write!(f, "{}", s),
            DataType::Vector(s, n) => write!(f, "{}{}", s, n),
            DataType::Matrix(s, r, c) => write!(f, "{}{}x{}", s, r, c),
        }
    }
}

/// ストレージクラスおよび補間修飾子
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum StorageModifier {
    Extern,
    Static,
    Uniform,
    Volatile,
    In,
    Out,
    InOut,
    Linear,
    Centroid,
    NoInterpolation,
    NoPerspective,
    Sample,
}

impl StorageModifier {
    /// 補間修飾子かどうか（関数の戻り値型には置けない）
    pub fn is_interpolation(&self) -> bool {
        matches!(
            self,
            StorageModifier::Linear
                | StorageModifier::Centroid
                | StorageModifier::NoInterpolation
                | StorageModifier::NoPerspective
                | StorageModifier::Sample
        )
    }
}

impl std::fmt::Display for StorageModifier {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            StorageModifier::Extern => write!(f, "extern"),
            StorageModifier::Static => write!(f, "static"),
            StorageModifier::Uniform => write!(f, "uniform"),
            StorageModifier::Volatile => write!(f, "volatile"),
            StorageModifier::In => write!(f, "in"),
            StorageModifier::Out => write!(f, "out"),
            StorageModifier::InOut => write!(f, "inout"),
            StorageModifier::Linear => write!(f, "linear"),
            StorageModifier::Centroid => write!(f, "centroid"),
            StorageModifier::NoInterpolation => write!(f, "nointerpolation"),
            StorageModifier::NoPerspective => write!(f, "noperspective"),
            StorageModifier::Sample => write!(f, "sample"),
        }
    }
}

/// 型修飾子
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum TypeModifier {
    Const,
    RowMajor,
    ColumnMajor,
}

impl std::fmt::Display for TypeModifier {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            TypeModifier::Const => write!(f, "const"),
            TypeModifier::RowMajor => write!(f, "row_major"),
            TypeModifier::ColumnMajor => write!(f, "column_major"),
        }
    }
}

/// 型記述子の基底
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum TypeDenoter {
    /// void（関数の戻り値型のみ）
    Void,
    /// 組み込みデータ型
    Base(DataType),
    /// テクスチャ型（字句をそのまま保持）
    Texture(String),
    /// サンプラー型
    Sampler(String),
    /// インライン構造体宣言
    Struct(Box<StructDecl>),
    /// ユーザー定義型の名前
    Ident(String),
}

impl std::fmt::Display for TypeDenoter {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            TypeDenoter::Void => write!(f, "void"),
            TypeDenoter::Base(ty) => write!(f, "{}", ty),
            TypeDenoter::Texture(name) | TypeDenoter::Sampler(name) => write!(f, "{}", name),
            TypeDenoter::Struct(decl) => match &decl.name {
                Some(name) => write!(f, "struct {}", name),
                None => write!(f, "struct"),
            },
            TypeDenoter::Ident(name) => write!(f, "{}", name),
        }
    }
}

/// 変数の型記述子
///
/// 修飾子の列は出現順を保持する。
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VarType {
    pub storage_modifiers: Vec<StorageModifier>,
    pub type_modifiers: Vec<TypeModifier>,
    pub base: TypeDenoter,
    pub span: Span,
}

impl std::fmt::Display for VarType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        for m in &self.storage_modifiers {
            write!(f, "{} ", m)?;
        }
        for m in &self.type_modifiers {
            write!(f, "{} ", m)?;
        }
        write!(f, "{}", self.base)
    }
}

/// 識別子チェーンの1セグメント（識別子と後続の配列添字）
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VarIdentSegment {
    pub ident: String,
    pub array_indices: Vec<Expression>,
    pub span: Span,
}

/// 変数識別子チェーン
///
/// `buf.data[i].x` は3セグメントのチェーンになる。空にはならない。
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VarIdent {
    pub segments: Vec<VarIdentSegment>,
    pub span: Span,
}

impl std::fmt::Display for VarIdent {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        for (i, segment) in self.segments.iter().enumerate() {
            if i > 0 {
                write!(f, ".")?;
            }
            write!(f, "{}", segment.ident)?;
            for _ in &segment.array_indices {
                write!(f, "[...]")?;
            }
        }
        Ok(())
    }
}

/// packoffsetアノテーション
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PackOffset {
    pub register_name: String,
    pub component: Option<char>,
    pub span: Span,
}

/// 変数宣言の後置アノテーション
///
/// それぞれ独立した省略可能な接尾辞として解析される。
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum VarSemantic {
    /// 補間セマンティクス（SV_Position, TEXCOORD0 など）
    Semantic(String),
    /// レジスタスロット割り当て
    Register(String),
    /// 定数バッファ内のパックオフセット
    PackOffset(PackOffset),
}

/// 単一の変数宣言（名前、配列次元、アノテーション、初期化式）
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VarDecl {
    pub name: String,
    pub array_dims: Vec<Expression>,
    pub semantics: Vec<VarSemantic>,
    pub initializer: Option<Expression>,
    pub span: Span,
}
