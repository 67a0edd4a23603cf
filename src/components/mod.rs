pub mod combo_list;
pub mod heatmap;
pub mod profit_summary;
pub mod results_table;
pub mod seasonal_detail;
