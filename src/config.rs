use serde::Deserialize;

fn env_or(key: &str, fallback: &str) -> String {
    std::env::var(key).unwrap_or_else(|_| fallback.to_string())
}

#[derive(Debug, Clone, Deserialize)]
pub struct MinioConfig {
    pub endpoint: String,
    pub public_url: String,
    pub access_key: String,
    pub secret_key: String,
    pub bucket: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct WaConfig {
    pub gateway_url: String,
    pub destination: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct AppConfig {
    pub database_url: String,
    pub jwt_secret: String,
    pub minio: MinioConfig,
    pub wa: WaConfig,
}

impl AppConfig {
    pub fn from_env() -> anyhow::Result<Self> {
        // DATABASE_URL wins (cloud deploys); otherwise compose the local DSN
        // from DB_HOST the way the docker-compose setup expects.
        let database_url = std::env::var("DATABASE_URL").unwrap_or_else(|_| {
            let host = env_or("DB_HOST", "localhost");
            format!("postgres://postgres:rahasia@{host}:5432/waste_db")
        });

        let endpoint = env_or("MINIO_ENDPOINT", "http://localhost:9000");
        let minio = MinioConfig {
            public_url: env_or("MINIO_PUBLIC_URL", &endpoint),
            access_key: env_or("MINIO_ACCESS_KEY", "admin"),
            secret_key: env_or("MINIO_SECRET_KEY", "password123"),
            bucket: env_or("MINIO_BUCKET", "waste-photos"),
            endpoint,
        };

        let wa = WaConfig {
            gateway_url: env_or("WA_GATEWAY_URL", "http://wa-gateway:3000"),
            destination: env_or("WA_DESTINATION", "6289648186679"),
        };

        Ok(Self {
            database_url,
            jwt_secret: env_or("JWT_SECRET", "rahasia-negara-maggot"),
            minio,
            wa,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn from_env_falls_back_to_defaults() {
        let cfg = AppConfig::from_env().expect("config");
        assert_eq!(cfg.minio.bucket, "waste-photos");
        assert!(cfg.wa.gateway_url.starts_with("http"));
        assert!(!cfg.jwt_secret.is_empty());
    }
}
