use std::collections::HashMap;

use daybreak_core::fetch::{LookupClient, DEFAULT_MAX_RETRIES};
use parking_lot::Mutex;

use crate::error::LookupError;
use crate::types::{GeoResponse, NowResponse, WeatherSnapshot};

const GEO_API_BASE: &str = "https://geoapi.qweather.com";
const WEATHER_API_BASE: &str = "https://devapi.qweather.com";

/// Success value of the provider's body-level status field.
const SUCCESS_CODE: &str = "200";

/// Resolves region names to weather snapshots, memoized per region.
///
/// The cache is write-once per key and lives for the process; a region
/// already resolved this run costs zero network calls.
pub struct WeatherResolver {
    client: LookupClient,
    api_key: String,
    geo_base: String,
    weather_base: String,
    cache: Mutex<HashMap<String, WeatherSnapshot>>,
}

impl WeatherResolver {
    pub fn new(client: LookupClient, api_key: impl Into<String>) -> Self {
        Self::with_base_urls(client, api_key, GEO_API_BASE, WEATHER_API_BASE)
    }

    pub fn with_base_urls(
        client: LookupClient,
        api_key: impl Into<String>,
        geo_base: impl Into<String>,
        weather_base: impl Into<String>,
    ) -> Self {
        Self {
            client,
            api_key: api_key.into(),
            geo_base: geo_base.into(),
            weather_base: weather_base.into(),
            cache: Mutex::new(HashMap::new()),
        }
    }

    /// Resolve current weather for `region`.
    pub async fn resolve(&self, region: &str) -> Result<WeatherSnapshot, LookupError> {
        let cached = self.cache.lock().get(region).cloned();
        if let Some(snapshot) = cached {
            tracing::debug!(%region, "weather cache hit");
            return Ok(snapshot);
        }

        let location_id = self.lookup_location(region).await?;
        let snapshot = self.lookup_weather(region, &location_id).await?;

        self.cache
            .lock()
            .insert(region.to_string(), snapshot.clone());
        Ok(snapshot)
    }

    async fn lookup_location(&self, region: &str) -> Result<String, LookupError> {
        let url = format!(
            "{}/v2/city/lookup?location={}&key={}",
            self.geo_base,
            urlencoding::encode(region),
            self.api_key,
        );

        let body = self
            .client
            .fetch_json(&url, DEFAULT_MAX_RETRIES)
            .await
            .ok_or_else(|| LookupError::RegionNotFound(region.to_string()))?;
        let geo: GeoResponse = serde_json::from_value(body)
            .map_err(|_| LookupError::RegionNotFound(region.to_string()))?;

        if geo.code.as_deref() != Some(SUCCESS_CODE) {
            return Err(LookupError::RegionNotFound(region.to_string()));
        }

        geo.location
            .into_iter()
            .map(|location| location.id)
            .find(|id| !id.is_empty())
            .ok_or_else(|| LookupError::RegionNotFound(region.to_string()))
    }

    async fn lookup_weather(
        &self,
        region: &str,
        location_id: &str,
    ) -> Result<WeatherSnapshot, LookupError> {
        let url = format!(
            "{}/v7/weather/now?location={}&key={}",
            self.weather_base, location_id, self.api_key,
        );

        let body = self
            .client
            .fetch_json(&url, DEFAULT_MAX_RETRIES)
            .await
            .ok_or_else(|| LookupError::WeatherUnavailable(region.to_string()))?;
        let response: NowResponse = serde_json::from_value(body)
            .map_err(|_| LookupError::WeatherUnavailable(region.to_string()))?;

        if response.code.as_deref() != Some(SUCCESS_CODE) {
            return Err(LookupError::WeatherUnavailable(region.to_string()));
        }

        let now = response
            .now
            .ok_or_else(|| LookupError::WeatherUnavailable(region.to_string()))?;

        Ok(WeatherSnapshot {
            condition: now.text,
            temperature: format!("{}°C", now.temp),
            wind_direction: now.wind_dir,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use wiremock::matchers::{method, path, query_param};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn resolver(server: &MockServer) -> WeatherResolver {
        let client = LookupClient::new().unwrap();
        WeatherResolver::with_base_urls(client, "test_key", server.uri(), server.uri())
    }

    async fn mount_geo(server: &MockServer) {
        Mock::given(method("GET"))
            .and(path("/v2/city/lookup"))
            .and(query_param("location", "Shanghai"))
            .and(query_param("key", "test_key"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "code": "200",
                "location": [{"id": "101020100"}, {"id": "101020200"}]
            })))
            .expect(1)
            .named("geocoding lookup")
            .mount(server)
            .await;
    }

    #[tokio::test]
    async fn resolves_through_both_endpoints_and_caches() {
        let server = MockServer::start().await;
        mount_geo(&server).await;

        Mock::given(method("GET"))
            .and(path("/v7/weather/now"))
            .and(query_param("location", "101020100"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "code": "200",
                "now": {"text": "Cloudy", "temp": "21", "windDir": "NE"}
            })))
            .expect(1)
            .named("current weather")
            .mount(&server)
            .await;

        let resolver = resolver(&server);
        let first = resolver.resolve("Shanghai").await.unwrap();

        assert_eq!(first.condition, "Cloudy");
        assert_eq!(first.temperature, "21°C");
        assert_eq!(first.wind_direction, "NE");

        // Second resolve must be served from the cache: the expect(1)
        // counters above verify zero additional upstream calls.
        let second = resolver.resolve("Shanghai").await.unwrap();
        assert_eq!(first, second);
    }

    #[tokio::test]
    async fn non_success_geo_code_is_region_not_found() {
        let server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/v2/city/lookup"))
            .respond_with(
                ResponseTemplate::new(200).set_body_json(serde_json::json!({"code": "404"})),
            )
            .mount(&server)
            .await;

        let result = resolver(&server).resolve("Shanghai").await;
        assert!(matches!(result, Err(LookupError::RegionNotFound(_))));
    }

    #[tokio::test]
    async fn empty_location_list_is_region_not_found() {
        let server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/v2/city/lookup"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "code": "200",
                "location": []
            })))
            .mount(&server)
            .await;

        let result = resolver(&server).resolve("Atlantis").await;
        assert!(matches!(result, Err(LookupError::RegionNotFound(_))));
    }

    #[tokio::test]
    async fn failed_weather_step_is_weather_unavailable() {
        let server = MockServer::start().await;
        mount_geo(&server).await;

        Mock::given(method("GET"))
            .and(path("/v7/weather/now"))
            .respond_with(
                ResponseTemplate::new(200).set_body_json(serde_json::json!({"code": "500"})),
            )
            .mount(&server)
            .await;

        let result = resolver(&server).resolve("Shanghai").await;
        assert!(matches!(result, Err(LookupError::WeatherUnavailable(_))));
    }

    #[tokio::test]
    async fn failed_lookup_is_not_cached() {
        let server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/v2/city/lookup"))
            .respond_with(
                ResponseTemplate::new(200).set_body_json(serde_json::json!({"code": "404"})),
            )
            .up_to_n_times(1)
            .mount(&server)
            .await;
        Mock::given(method("GET"))
            .and(path("/v2/city/lookup"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "code": "200",
                "location": [{"id": "101020100"}]
            })))
            .mount(&server)
            .await;
        Mock::given(method("GET"))
            .and(path("/v7/weather/now"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "code": "200",
                "now": {"text": "Sunny", "temp": "28", "windDir": "S"}
            })))
            .mount(&server)
            .await;

        let resolver = resolver(&server);
        assert!(resolver.resolve("Shanghai").await.is_err());

        let snapshot = resolver.resolve("Shanghai").await.unwrap();
        assert_eq!(snapshot.condition, "Sunny");
    }
}
