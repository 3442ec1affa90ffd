//! 目录操作错误类型
//!
//! 存储层返回的 `DbErr` 在服务层被归类：连接/连接池获取失败与超时视为可重试，
//! 其余（约束冲突、查询错误、更新目标不存在等）视为存储拒绝，不可重试。

use sea_orm::DbErr;

#[derive(Debug, thiserror::Error)]
pub enum CatalogError {
    /// 调用方提供的参数不合法
    #[error("参数无效: {0}")]
    InvalidInput(String),

    /// 配置无法解析
    #[error("配置错误: {0}")]
    Config(String),

    /// 存储暂时不可达
    #[error("存储不可用: {0}")]
    Unavailable(#[source] DbErr),

    /// 操作超过配置的时限
    #[error("操作超时 ({0} ms)")]
    TimedOut(u128),

    /// 存储拒绝了该操作
    #[error("存储拒绝操作: {0}")]
    Rejected(#[source] DbErr),
}

impl CatalogError {
    pub fn is_retryable(&self) -> bool {
        matches!(self, CatalogError::Unavailable(_) | CatalogError::TimedOut(_))
    }
}

impl From<DbErr> for CatalogError {
    fn from(err: DbErr) -> Self {
        match err {
            DbErr::ConnectionAcquire(_) | DbErr::Conn(_) => CatalogError::Unavailable(err),
            _ => CatalogError::Rejected(err),
        }
    }
}
