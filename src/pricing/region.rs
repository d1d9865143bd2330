//! Normalizes AWS region codes into the strings the pricing catalog and
//! CloudWatch-style usage types expect.

/// Catalog location name for a region code, e.g. `us-east-1` -> `US East (N. Virginia)`.
/// Unknown regions pass through unchanged.
pub fn location_name(region: &str) -> String {
    match region {
        "us-east-1" => "US East (N. Virginia)",
        "us-east-2" => "US East (Ohio)",
        "us-west-1" => "US West (N. California)",
        "us-west-2" => "US West (Oregon)",
        "eu-west-1" => "EU (Ireland)",
        "eu-west-2" => "EU (London)",
        "eu-central-1" => "EU (Frankfurt)",
        "ap-southeast-1" => "Asia Pacific (Singapore)",
        "ap-southeast-2" => "Asia Pacific (Sydney)",
        "ap-northeast-1" => "Asia Pacific (Tokyo)",
        other => return other.to_string(),
    }
    .to_string()
}

/// Usage-type prefix for a region code, e.g. `us-east-1` -> `USE1-`.
/// Unknown regions yield an empty prefix.
pub fn usage_type_prefix(region: &str) -> String {
    match region {
        "us-east-1" => "USE1-",
        "us-east-2" => "USE2-",
        "us-west-1" => "USW1-",
        "us-west-2" => "USW2-",
        "eu-west-1" => "EU-",
        "eu-west-2" => "EUW2-",
        "eu-central-1" => "EUC1-",
        "ap-southeast-1" => "APS1-",
        "ap-southeast-2" => "APS2-",
        "ap-northeast-1" => "APN1-",
        _ => "",
    }
    .to_string()
}
