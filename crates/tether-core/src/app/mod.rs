//! App - アプリケーション層
//!
//! ports を組み合わせて、sink と subscription のライフサイクルを結び付けます。
//!
//! # 主要コンポーネント
//! - **LifecycleSink**: sink を包み、attach した subscription を close 時に cancel
//! - **ReactOptions**: error / done を event に変換する設定

pub mod lifecycle;
pub mod reaction;

// 主要な型を再エクスポート
pub use self::lifecycle::LifecycleSink;
pub use self::reaction::ReactOptions;
