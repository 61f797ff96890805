pub use error::EngineError;
pub use ops::{
    Analytics, CategoryTotal, CreateTransactionCmd, DEFAULT_CATEGORY_LIMIT, DEFAULT_WINDOW_MONTHS,
    Engine, EngineBuilder, ExpenseCategoryTotal, MonthBucket, MonthlyBucket, PageRequest, Summary,
    Totals, TransactionFilter, TransactionPage, UpdateTransactionCmd,
};
pub use transactions::{Transaction, TransactionKind};

mod error;
mod ops;
mod transactions;

type ResultEngine<T> = Result<T, EngineError>;
