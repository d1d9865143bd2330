use super::Calculator;
use crate::config::Config;
use crate::pricing::cache::PriceQueryParams;
use crate::pricing::client::PricingClient;
use crate::pricing::region::location_name;
use crate::pricing::{Confidence, MonthlyCost};
use crate::template::ResourceWithId;
use async_trait::async_trait;

const DEFAULT_STORAGE_GB: f64 = 50.0;
const FALLBACK_PRICE_PER_GB: f64 = 0.023;

pub struct S3BucketCalculator;

#[async_trait]
impl Calculator for S3BucketCalculator {
    fn supports(&self, resource_type: &str) -> bool {
        resource_type == "AWS::S3::Bucket"
    }

    async fn calculate_cost(
        &self,
        _resource: &ResourceWithId,
        region: &str,
        client: &PricingClient,
        config: &Config,
        _siblings: &[ResourceWithId],
    ) -> MonthlyCost {
        let storage_gb = config.usage_assumptions.s3_storage_gb.unwrap_or(DEFAULT_STORAGE_GB);

        let params = PriceQueryParams::new(
            "AmazonS3",
            location_name(region),
            vec![
                ("storageClass".to_string(), "General Purpose".to_string()),
                ("volumeType".to_string(), "Standard".to_string()),
            ],
        );

        match client.get_price(&params).await {
            Some(price_per_gb) => MonthlyCost {
                amount: storage_gb * price_per_gb,
                currency: "USD".to_string(),
                confidence: Confidence::Medium,
                assumptions: vec![format!("S3 Standard: {storage_gb:.0} GB/month assumed")],
            },
            None => MonthlyCost {
                amount: storage_gb * FALLBACK_PRICE_PER_GB,
                currency: "USD".to_string(),
                confidence: Confidence::Low,
                assumptions: vec![format!(
                    "S3 Standard: {storage_gb:.0} GB/month assumed, catalog unavailable, fallback rate ${FALLBACK_PRICE_PER_GB}/GB"
                )],
            },
        }
    }
}
