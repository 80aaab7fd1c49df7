//! セマンティック解析モジュール
//!
//! 宣言の登録、インポート解決、型参照の解決、依存順の型構築、
//! 名前空間の循環検出、既定値の遅延評価を行います。

mod ambiguity;
mod builders;
mod compilation;
mod deferred;
mod fields;
mod imports;
mod namespace_cycles;
mod ordering;
mod registry;
mod resolver;
mod restriction;
mod scope;
mod semantic_analyzer;

// 公開API
pub use compilation::{Compilation, CompilationResult};
