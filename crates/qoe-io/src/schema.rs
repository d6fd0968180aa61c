//! Column names of the windowed flow-statistics tables.

/// Round-trip latency in milliseconds.
pub const LATENCY_COLUMN: &str = "ping";

/// Self-reported QoE score, 1 to 5.
pub const SURVEY_COLUMN: &str = "self_rate_qoe_score";

/// Experiment identifier.
pub const EXPERIMENT_COLUMN: &str = "exp_id";

/// Columns every dataset must carry.
pub const REQUIRED_COLUMNS: [&str; 3] = [LATENCY_COLUMN, SURVEY_COLUMN, EXPERIMENT_COLUMN];

/// Model input features, `<direction>_<metric>[_<stat>]`.
pub const FEATURE_COLUMNS: [&str; 30] = [
    "src2dst_avg_pkt_size",
    "src2dst_avg_pkt_size_mean",
    "src2dst_avg_pkt_size_median",
    "src2dst_avg_pkt_size_std",
    "src2dst_avg_pkt_size_min",
    "src2dst_avg_pkt_size_max",
    "src2dst_pps",
    "src2dst_pps_mean",
    "src2dst_pps_median",
    "src2dst_pps_std",
    "src2dst_pps_min",
    "src2dst_pps_max",
    "dst2src_avg_pkt_size",
    "dst2src_avg_pkt_size_mean",
    "dst2src_avg_pkt_size_median",
    "dst2src_avg_pkt_size_std",
    "dst2src_avg_pkt_size_min",
    "dst2src_avg_pkt_size_max",
    "dst2src_pps",
    "dst2src_pps_mean",
    "dst2src_pps_median",
    "dst2src_pps_std",
    "dst2src_pps_min",
    "dst2src_pps_max",
    "pkt_dir_ratio",
    "pkt_dir_ratio_mean",
    "pkt_dir_ratio_median",
    "pkt_dir_ratio_std",
    "pkt_dir_ratio_min",
    "pkt_dir_ratio_max",
];
