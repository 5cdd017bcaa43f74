//! グローバル宣言の定義

use serde::{Deserialize, Serialize};

use super::{Attribute, CodeBlock, DataType, PackOffset, Span, VarDeclStatement, VarType};

/// トップレベルの宣言
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum GlobalDecl {
    Function(FunctionDecl),
    UniformBuffer(UniformBufferDecl),
    Texture(TextureDecl),
    Sampler(SamplerDecl),
    Struct(StructDecl),
    Directive(DirectiveDecl),
    VarDeclStmt(VarDeclStatement),
}

/// 関数宣言
///
/// `body`が`None`の場合はプロトタイプ宣言。
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FunctionDecl {
    pub attribs: Vec<Attribute>,
    pub return_type: VarType,
    pub name: String,
    pub params: Vec<VarDeclStatement>,
    pub semantic: Option<String>,
    pub body: Option<CodeBlock>,
    pub span: Span,
}

/// リソースバッファの種別
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum BufferKind {
    CBuffer,
    TBuffer,
}

impl std::fmt::Display for BufferKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            BufferKind::CBuffer => write!(f, "cbuffer"),
            BufferKind::TBuffer => write!(f, "tbuffer"),
        }
    }
}

/// バッファ宣言の束縛対象
///
/// 各束縛対象が自身のレジスタ・パックオフセットアノテーションを
/// 独立して所有する。
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BufferDeclIdent {
    pub name: String,
    pub register_name: Option<String>,
    pub pack_offset: Option<PackOffset>,
    pub span: Span,
}

/// 定数バッファ宣言（cbuffer / tbuffer）
///
/// `idents`は空にならない。
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UniformBufferDecl {
    pub kind: BufferKind,
    pub idents: Vec<BufferDeclIdent>,
    pub members: Vec<VarDeclStatement>,
    pub span: Span,
}

/// テクスチャ宣言
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TextureDecl {
    pub texture_type: String,
    pub format: Option<DataType>,
    pub idents: Vec<BufferDeclIdent>,
    pub span: Span,
}

/// サンプラー宣言
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SamplerDecl {
    pub sampler_type: String,
    pub idents: Vec<BufferDeclIdent>,
    pub span: Span,
}

/// 構造体宣言（型位置では無名も可）
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StructDecl {
    pub name: Option<String>,
    pub members: Vec<VarDeclStatement>,
    pub span: Span,
}

/// プリプロセッサ指令宣言
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DirectiveDecl {
    pub line: String,
    pub span: Span,
}

impl std::fmt::Display for GlobalDecl {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            GlobalDecl::Function(decl) => {
                write!(f, "{} {}(", decl.return_type, decl.name)?;
                for (i, param) in decl.params.iter().enumerate() {
                    if i > 0 {
                        write!(f, ", ")?;
                    }
                    write!(f, "{}", param.var_type)?;
                    if let Some(var_decl) = param.var_decls.first() {
                        write!(f, " {}", var_decl.name)?;
                    }
                }
                write!(f, ")")?;
                match &decl.body {
                    Some(_) => write!(f, " {{ ... }}"),
                    None => write!(f, ";"),
                }
            }
            GlobalDecl::UniformBuffer(decl) => {
                write!(f, "{}", decl.kind)?;
                for (i, ident) in decl.idents.iter().enumerate() {
                    if i > 0 {
                        write!(f, ",")?;
                    }
                    write!(f, " {}", ident.name)?;
                }
                write!(f, " {{ ... }}")
            }
            GlobalDecl::Texture(decl) => write!(f, "{} ...;", decl.texture_type),
            GlobalDecl::Sampler(decl) => write!(f, "{} ...;", decl.sampler_type),
            GlobalDecl::Struct(decl) => match &decl.name {
                Some(name) => write!(f, "struct {} {{ ... }};", name),
                None => write!(f, "struct {{ ... }};"),
            },
            GlobalDecl::Directive(decl) => write!(f, "{}", decl.line),
            GlobalDecl::VarDeclStmt(decl) => write!(f, "{} ...;", decl.var_type),
        }
    }
}
