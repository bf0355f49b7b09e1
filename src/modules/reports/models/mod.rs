mod chart;
mod financial_summary;

pub use chart::{AnalyticsView, BarPoint, ChartPoint, Dashboard};
pub use financial_summary::{
    ClassRevenue, FinancialSummary, MonthlyAmount, RecentPayment, StudentTotal,
};
