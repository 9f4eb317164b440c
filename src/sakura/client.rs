//! HTTP client for the SIM and mobile gateway endpoints.
//!
//! Requests are sent one at a time with Basic authentication. The
//! `parse_*` functions map a status code and body to a result and carry all
//! of the status handling, so they are tested without a server.

use super::api::SimApi;
use crate::config::{Credentials, Settings, Zone, API_VERSION_PATH, SIM_ZONE};
use crate::error::{Error, Result};
use crate::models::{
    FatalResponse, GatewaySim, IsOkResponse, SimCreateResponse, SimListResponse, SimRecord,
};
use reqwest::header::CONTENT_TYPE;
use reqwest::{RequestBuilder, StatusCode};
use serde::de::DeserializeOwned;
use serde_json::json;
use std::collections::HashSet;
use std::net::Ipv4Addr;

const OP_LIST_SIMS: &str = "SIM listing";
const OP_CREATE_SIM: &str = "SIM creation";
const OP_ATTACH_SIM: &str = "SIM attach to mobile gateway";
const OP_ASSIGN_IP: &str = "SIM IP address assignment";

/// Client bound to one zone and mobile gateway.
pub struct SakuraClient {
    http: reqwest::Client,
    api_root: String,
    credentials: Credentials,
    zone: Zone,
    mgw_resource_id: String,
}

impl SakuraClient {
    pub fn new(settings: &Settings) -> Result<SakuraClient> {
        let http = reqwest::Client::builder()
            .user_agent(concat!(env!("CARGO_PKG_NAME"), "/", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(|source| Error::Http {
                operation: "HTTP client setup",
                source,
            })?;
        Ok(SakuraClient::with_http(settings, http))
    }

    /// Client on an already configured `reqwest::Client`.
    pub fn with_http(settings: &Settings, http: reqwest::Client) -> SakuraClient {
        SakuraClient {
            http,
            api_root: settings.api_root.clone(),
            credentials: settings.credentials.clone(),
            zone: settings.zone,
            mgw_resource_id: settings.mgw_resource_id.clone(),
        }
    }

    fn url(&self, zone: Zone, path: &str) -> String {
        endpoint_url(&self.api_root, zone, path)
    }

    fn gateway_sims_path(&self) -> String {
        format!("appliance/{}/mobilegateway/sims", self.mgw_resource_id)
    }

    /// Send a request and return the status and body text.
    async fn send(
        &self,
        operation: &'static str,
        request: RequestBuilder,
    ) -> Result<(StatusCode, String)> {
        let response = request
            .basic_auth(&self.credentials.token, Some(&self.credentials.secret))
            .send()
            .await
            .map_err(|source| Error::Http { operation, source })?;
        let status = response.status();
        let body = response
            .text()
            .await
            .map_err(|source| Error::Http { operation, source })?;
        log::debug!("{operation}: HTTP {status}, {} bytes", body.len());
        log::trace!("{operation} body: {body}");
        Ok((status, body))
    }

    fn json_body(request: RequestBuilder, body: serde_json::Value) -> RequestBuilder {
        request
            .header(CONTENT_TYPE, "application/json")
            .body(body.to_string())
    }
}

impl SimApi for SakuraClient {
    async fn used_addresses(&self) -> Result<HashSet<Ipv4Addr>> {
        let mut used = HashSet::new();
        let mut from = 0usize;
        let mut page_no = 0usize;

        loop {
            let url = format!("{}?From={from}", self.url(self.zone, &self.gateway_sims_path()));
            let (status, body) = self.send(OP_LIST_SIMS, self.http.get(url)).await?;
            let page = parse_sim_list(status, &body)?;
            let page_len = page.sim.len();

            used.extend(addresses_of(&page.sim));
            from += page_len;
            log::info!(
                "got page#{page_no:2} sims=+{page_len:3} => {from:3} of {total}",
                total = page.total
            );

            if page_len == 0 || from >= page.total {
                break;
            }
            page_no += 1;
        }

        log::info!("{} addresses in use on mobile gateway {}", used.len(), self.mgw_resource_id);
        Ok(used)
    }

    async fn create_sim(&self, sim: &SimRecord) -> Result<Option<String>> {
        let body = json!({
            "CommonServiceItem": {
                "Name": sim.iccid,
                "Status": { "ICCID": sim.iccid },
                "Remark": { "PassCode": sim.passcode },
                "Provider": { "Class": "sim" }
            }
        });
        let request = self.http.post(self.url(SIM_ZONE, "commonserviceitem"));
        let (status, body) = self
            .send(OP_CREATE_SIM, Self::json_body(request, body))
            .await?;
        parse_create_sim(status, &body)
    }

    async fn attach_sim(&self, sim_id: &str) -> Result<()> {
        let body = json!({ "sim": { "resource_id": sim_id } });
        let request = self.http.post(self.url(self.zone, &self.gateway_sims_path()));
        let (status, body) = self
            .send(OP_ATTACH_SIM, Self::json_body(request, body))
            .await?;
        parse_attach_sim(status, &body, sim_id)
    }

    async fn assign_ip(&self, sim_id: &str, ip: Ipv4Addr) -> Result<()> {
        let body = json!({ "sim": { "ip": ip.to_string() } });
        let path = format!("commonserviceitem/{sim_id}/sim/ip");
        let request = self.http.put(self.url(SIM_ZONE, &path));
        let (status, body) = self
            .send(OP_ASSIGN_IP, Self::json_body(request, body))
            .await?;
        parse_assign_ip(status, &body, sim_id, ip)
    }
}

/// Full URL of an endpoint in `zone`.
pub fn endpoint_url(api_root: &str, zone: Zone, path: &str) -> String {
    format!("{api_root}/{zone}/{API_VERSION_PATH}/{path}")
}

/// Parseable IPv4 addresses of the listed SIMs; blank or invalid entries are skipped.
pub fn addresses_of(sims: &[GatewaySim]) -> impl Iterator<Item = Ipv4Addr> + '_ {
    sims.iter().filter_map(|sim| {
        let ip = sim.ip.as_deref().map(str::trim).filter(|ip| !ip.is_empty())?;
        match ip.parse() {
            Ok(addr) => Some(addr),
            Err(_) => {
                log::debug!("ignoring SIM {:?} with address '{ip}'", sim.iccid);
                None
            }
        }
    })
}

fn decode<T: DeserializeOwned>(operation: &'static str, body: &str) -> Result<T> {
    let mut deserializer = serde_json::Deserializer::from_str(body);
    serde_path_to_error::deserialize(&mut deserializer).map_err(|e| Error::Decode {
        operation,
        path: e.path().to_string(),
        message: e.inner().to_string(),
    })
}

/// Error for a non-success status: 401, the fatal payload, or the bare status.
fn failure(operation: &'static str, status: StatusCode, body: &str) -> Error {
    if status == StatusCode::UNAUTHORIZED {
        return Error::Unauthorized { operation };
    }
    match serde_json::from_str::<FatalResponse>(body) {
        Ok(fatal) if !fatal.serial.is_empty() || !fatal.error_msg.is_empty() => {
            log::debug!("{operation}: fatal={} error_code={}", fatal.is_fatal, fatal.error_code);
            Error::ApiFatal {
                serial: fatal.serial,
                status: fatal.status,
                error_code: fatal.error_code,
                message: fatal.error_msg,
            }
        }
        _ => Error::UnexpectedStatus {
            operation,
            status: status.as_u16(),
        },
    }
}

pub fn parse_sim_list(status: StatusCode, body: &str) -> Result<SimListResponse> {
    match status {
        StatusCode::OK => decode(OP_LIST_SIMS, body),
        StatusCode::NOT_FOUND => Err(Error::GatewayNotFound),
        _ => Err(failure(OP_LIST_SIMS, status, body)),
    }
}

/// `Some(id)` on 201, `None` on 409 (already registered).
pub fn parse_create_sim(status: StatusCode, body: &str) -> Result<Option<String>> {
    match status {
        StatusCode::CREATED => {
            let res: SimCreateResponse = decode(OP_CREATE_SIM, body)?;
            Ok(Some(res.common_service_item.id))
        }
        StatusCode::CONFLICT => Ok(None),
        _ => Err(failure(OP_CREATE_SIM, status, body)),
    }
}

pub fn parse_attach_sim(status: StatusCode, body: &str, sim_id: &str) -> Result<()> {
    if status != StatusCode::OK {
        return Err(failure(OP_ATTACH_SIM, status, body));
    }
    let res: IsOkResponse = decode(OP_ATTACH_SIM, body)?;
    if !res.is_ok {
        return Err(Error::AttachRejected {
            sim_id: sim_id.to_string(),
        });
    }
    Ok(())
}

pub fn parse_assign_ip(status: StatusCode, body: &str, sim_id: &str, ip: Ipv4Addr) -> Result<()> {
    if status != StatusCode::OK {
        return Err(failure(OP_ASSIGN_IP, status, body));
    }
    let res: IsOkResponse = decode(OP_ASSIGN_IP, body)?;
    if !res.is_ok {
        return Err(Error::IpAssignmentRejected {
            sim_id: sim_id.to_string(),
            ip,
        });
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Ipv4;
    use tokio::io::{AsyncReadExt, AsyncWriteExt};
    use tokio::net::{TcpListener, TcpStream};
    use tokio::task::JoinHandle;

    const FATAL_BODY: &str = r#"{
        "is_fatal": true,
        "serial": "e3b0c44298fc1c14",
        "status": "400 Bad Request",
        "error_code": "bad_request",
        "error_msg": "ICCID or PassCode is invalid"
    }"#;

    #[test]
    fn test_endpoint_url() {
        assert_eq!(
            endpoint_url("https://secure.sakura.ad.jp/cloud/zone", Zone::Tk1b, "commonserviceitem"),
            "https://secure.sakura.ad.jp/cloud/zone/tk1b/api/cloud/1.1/commonserviceitem"
        );
    }

    #[test]
    fn test_parse_sim_list() {
        let body = r#"{"sim":[{"iccid":"1","ip":"192.168.0.1"},{"iccid":"2","ip":""}],"is_ok":true,"Total":2,"From":0,"Count":2}"#;
        let res = parse_sim_list(StatusCode::OK, body).unwrap();
        let used: HashSet<Ipv4Addr> = addresses_of(&res.sim).collect();
        assert_eq!(used, HashSet::from([Ipv4Addr::new(192, 168, 0, 1)]));
    }

    #[test]
    fn test_parse_sim_list_errors() {
        assert!(matches!(
            parse_sim_list(StatusCode::UNAUTHORIZED, ""),
            Err(Error::Unauthorized { .. })
        ));
        assert!(matches!(
            parse_sim_list(StatusCode::NOT_FOUND, ""),
            Err(Error::GatewayNotFound)
        ));
        assert!(matches!(
            parse_sim_list(StatusCode::INTERNAL_SERVER_ERROR, "<html>"),
            Err(Error::UnexpectedStatus { status: 500, .. })
        ));
    }

    #[test]
    fn test_parse_sim_list_decode_error_has_path() {
        let err = parse_sim_list(StatusCode::OK, r#"{"sim":[{"ip":42}]}"#).unwrap_err();
        match err {
            Error::Decode { path, .. } => assert_eq!(path, "sim[0].ip"),
            other => panic!("unexpected error {other:?}"),
        }
    }

    #[test]
    fn test_addresses_of_skips_invalid() {
        let sims = vec![
            GatewaySim {
                iccid: Some("1".to_string()),
                ip: Some("10.0.0.5".to_string()),
            },
            GatewaySim {
                iccid: Some("2".to_string()),
                ip: Some("not-an-ip".to_string()),
            },
            GatewaySim {
                iccid: Some("3".to_string()),
                ip: None,
            },
        ];
        let used: Vec<Ipv4Addr> = addresses_of(&sims).collect();
        assert_eq!(used, vec![Ipv4Addr::new(10, 0, 0, 5)]);
    }

    #[test]
    fn test_parse_create_sim() {
        let body = r#"{"CommonServiceItem":{"ID":"112900000123"},"Success":true,"is_ok":true}"#;
        assert_eq!(
            parse_create_sim(StatusCode::CREATED, body).unwrap(),
            Some("112900000123".to_string())
        );
        assert_eq!(parse_create_sim(StatusCode::CONFLICT, FATAL_BODY).unwrap(), None);
    }

    #[test]
    fn test_parse_create_sim_fatal() {
        let err = parse_create_sim(StatusCode::BAD_REQUEST, FATAL_BODY).unwrap_err();
        assert_eq!(
            err.to_string(),
            "e3b0c44298fc1c14: (400 Bad Request)ICCID or PassCode is invalid"
        );
        assert!(matches!(
            parse_create_sim(StatusCode::UNAUTHORIZED, FATAL_BODY),
            Err(Error::Unauthorized { .. })
        ));
    }

    #[test]
    fn test_parse_attach_sim() {
        assert!(parse_attach_sim(StatusCode::OK, r#"{"is_ok":true}"#, "1").is_ok());
        assert!(matches!(
            parse_attach_sim(StatusCode::OK, r#"{"is_ok":false}"#, "1"),
            Err(Error::AttachRejected { .. })
        ));
        assert!(matches!(
            parse_attach_sim(StatusCode::CONFLICT, FATAL_BODY, "1"),
            Err(Error::ApiFatal { .. })
        ));
    }

    #[test]
    fn test_parse_assign_ip() {
        let ip = Ipv4Addr::new(192, 168, 0, 5);
        assert!(parse_assign_ip(StatusCode::OK, r#"{"is_ok":true}"#, "1", ip).is_ok());
        match parse_assign_ip(StatusCode::OK, r#"{"is_ok":false}"#, "1", ip) {
            Err(Error::IpAssignmentRejected { sim_id, ip: rejected }) => {
                assert_eq!(sim_id, "1");
                assert_eq!(rejected, ip);
            }
            other => panic!("unexpected result {other:?}"),
        }
        assert!(matches!(
            parse_assign_ip(StatusCode::UNAUTHORIZED, "", "1", ip),
            Err(Error::Unauthorized { .. })
        ));
    }

    /// One request as the stub server saw it.
    #[derive(Debug)]
    struct Seen {
        line: String,
        authorization: Option<String>,
        body: String,
    }

    impl Seen {
        fn json(&self) -> serde_json::Value {
            serde_json::from_str(&self.body).unwrap()
        }
    }

    async fn read_request(stream: &mut TcpStream) -> Seen {
        let mut buf = Vec::new();
        let mut chunk = [0u8; 1024];
        let head_end = loop {
            let n = stream.read(&mut chunk).await.unwrap();
            assert!(n > 0, "connection closed before end of headers");
            buf.extend_from_slice(&chunk[..n]);
            if let Some(pos) = buf.windows(4).position(|w| w == b"\r\n\r\n") {
                break pos + 4;
            }
        };

        let head = String::from_utf8_lossy(&buf[..head_end]).to_string();
        let header = |name: &str| {
            head.lines().skip(1).find_map(|l| {
                let (key, value) = l.split_once(':')?;
                key.eq_ignore_ascii_case(name).then(|| value.trim().to_string())
            })
        };
        let length: usize = header("content-length").map_or(0, |v| v.parse().unwrap());
        while buf.len() < head_end + length {
            let n = stream.read(&mut chunk).await.unwrap();
            assert!(n > 0, "connection closed before end of body");
            buf.extend_from_slice(&chunk[..n]);
        }

        Seen {
            line: head.lines().next().unwrap_or_default().to_string(),
            authorization: header("authorization"),
            body: String::from_utf8_lossy(&buf[head_end..head_end + length]).to_string(),
        }
    }

    /// Answer one connection per canned `(status, body)` and return what was asked.
    async fn stub_server(replies: Vec<(u16, &'static str)>) -> (String, JoinHandle<Vec<Seen>>) {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();

        let handle = tokio::spawn(async move {
            let mut seen = Vec::new();
            for (status, body) in replies {
                let (mut stream, _) = listener.accept().await.unwrap();
                seen.push(read_request(&mut stream).await);
                let reply = format!(
                    "HTTP/1.1 {status} Stub\r\ncontent-type: application/json\r\ncontent-length: {}\r\nconnection: close\r\n\r\n{body}",
                    body.len()
                );
                stream.write_all(reply.as_bytes()).await.unwrap();
                let _ = stream.shutdown().await;
            }
            seen
        });

        (format!("http://{addr}/zone"), handle)
    }

    fn stub_client(api_root: String) -> SakuraClient {
        let settings = Settings {
            credentials: Credentials {
                token: "tok".to_string(),
                secret: "sec".to_string(),
            },
            zone: Zone::Tk1b,
            network: Ipv4::new("192.168.0.0/24").unwrap(),
            mgw_resource_id: "MGW".to_string(),
            api_root,
        };
        // the stub is local, so ignore any proxy from the environment
        let http = reqwest::Client::builder().no_proxy().build().unwrap();
        SakuraClient::with_http(&settings, http)
    }

    const GATEWAY_SIMS: &str = "/zone/tk1b/api/cloud/1.1/appliance/MGW/mobilegateway/sims";

    #[tokio::test]
    async fn test_client_requests_against_stub() {
        let (api_root, server) = stub_server(vec![
            (
                200,
                r#"{"sim":[{"iccid":"1","ip":"192.168.0.1"},{"iccid":"2","ip":"192.168.0.2"}],"is_ok":true,"Total":3,"From":0,"Count":2}"#,
            ),
            (
                200,
                r#"{"sim":[{"iccid":"3","ip":"192.168.0.3"}],"is_ok":true,"Total":3,"From":2,"Count":1}"#,
            ),
            (201, r#"{"CommonServiceItem":{"ID":"S1"},"Success":true,"is_ok":true}"#),
            (200, r#"{"is_ok":true}"#),
            (200, r#"{"is_ok":true}"#),
            (409, FATAL_BODY),
        ])
        .await;
        let client = stub_client(api_root);

        let used = client.used_addresses().await.unwrap();
        let sim = SimRecord::new("8981100000000000001", "pass01");
        let created = client.create_sim(&sim).await.unwrap();
        client.attach_sim("S1").await.unwrap();
        client
            .assign_ip("S1", Ipv4Addr::new(192, 168, 0, 4))
            .await
            .unwrap();
        let existing = client.create_sim(&sim).await.unwrap();

        assert_eq!(
            used,
            HashSet::from([
                Ipv4Addr::new(192, 168, 0, 1),
                Ipv4Addr::new(192, 168, 0, 2),
                Ipv4Addr::new(192, 168, 0, 3),
            ])
        );
        assert_eq!(created, Some("S1".to_string()));
        assert_eq!(existing, None);

        let seen = server.await.unwrap();
        let lines: Vec<&str> = seen.iter().map(|s| s.line.as_str()).collect();
        assert_eq!(
            lines,
            vec![
                format!("GET {GATEWAY_SIMS}?From=0 HTTP/1.1"),
                format!("GET {GATEWAY_SIMS}?From=2 HTTP/1.1"),
                "POST /zone/is1a/api/cloud/1.1/commonserviceitem HTTP/1.1".to_string(),
                format!("POST {GATEWAY_SIMS} HTTP/1.1"),
                "PUT /zone/is1a/api/cloud/1.1/commonserviceitem/S1/sim/ip HTTP/1.1".to_string(),
                "POST /zone/is1a/api/cloud/1.1/commonserviceitem HTTP/1.1".to_string(),
            ]
        );
        // base64("tok:sec")
        assert!(seen
            .iter()
            .all(|s| s.authorization.as_deref() == Some("Basic dG9rOnNlYw==")));

        let create = seen[2].json();
        assert_eq!(create["CommonServiceItem"]["Name"], "8981100000000000001");
        assert_eq!(create["CommonServiceItem"]["Status"]["ICCID"], "8981100000000000001");
        assert_eq!(create["CommonServiceItem"]["Remark"]["PassCode"], "pass01");
        assert_eq!(create["CommonServiceItem"]["Provider"]["Class"], "sim");
        assert_eq!(seen[3].json(), serde_json::json!({ "sim": { "resource_id": "S1" } }));
        assert_eq!(seen[4].json(), serde_json::json!({ "sim": { "ip": "192.168.0.4" } }));
    }

    #[tokio::test]
    async fn test_client_paging_stops_on_empty_page() {
        let (api_root, server) = stub_server(vec![
            (
                200,
                r#"{"sim":[{"iccid":"1","ip":"10.0.0.9"}],"is_ok":true,"Total":5,"From":0,"Count":1}"#,
            ),
            (200, r#"{"sim":[],"is_ok":true,"Total":5,"From":1,"Count":0}"#),
        ])
        .await;
        let client = stub_client(api_root);

        let used = client.used_addresses().await.unwrap();
        assert_eq!(used, HashSet::from([Ipv4Addr::new(10, 0, 0, 9)]));

        let seen = server.await.unwrap();
        assert_eq!(seen.len(), 2);
        assert!(seen[1].line.contains("?From=1 "));
    }

    #[tokio::test]
    async fn test_client_unknown_gateway() {
        let (api_root, server) = stub_server(vec![(404, FATAL_BODY)]).await;
        let client = stub_client(api_root);

        assert!(matches!(
            client.used_addresses().await,
            Err(Error::GatewayNotFound)
        ));
        assert_eq!(server.await.unwrap().len(), 1);
    }
}
