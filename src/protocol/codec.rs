//! JSON envelope codec
//!
//! Every message is one UTF-8 JSON object per datagram, except the ACK which
//! is the bare marker [`ACK_MARKER`].

use std::net::IpAddr;

use bytes::Bytes;
use serde_json::Value;

use super::constants::ACK_MARKER;
use super::content::{ContentType, Endpoint};
use super::message::{
    ControlRequest, Inbound, Notification, NotificationRef, RawControlRequest,
};
use crate::error::CodecError;

/// Encode a notification
///
/// Called once per fan-out tick; the returned `Bytes` is shared by every send.
pub fn encode(content_type: ContentType, params: &[Value]) -> Result<Bytes, CodecError> {
    let body = serde_json::to_vec(&NotificationRef {
        content_type,
        params,
    })?;
    Ok(Bytes::from(body))
}

/// Decode a notification
pub fn decode(data: &[u8]) -> Result<Notification, CodecError> {
    Ok(serde_json::from_slice(data)?)
}

/// Encode a control request
pub fn encode_request(request: &ControlRequest) -> Result<Bytes, CodecError> {
    let raw = RawControlRequest {
        request: request.kind.as_str().to_owned(),
        shape: request.content_type,
        udp_port: request.callback.port,
        udp_ip: request.callback.ip.to_string(),
    };
    Ok(Bytes::from(serde_json::to_vec(&raw)?))
}

/// Decode a control request
///
/// An unrecognised `request` tag still decodes (as [`RequestKind::Other`])
/// so the receiver knows where to send the ACK.
///
/// [`RequestKind::Other`]: super::message::RequestKind::Other
pub fn decode_request(data: &[u8]) -> Result<ControlRequest, CodecError> {
    let raw: RawControlRequest = serde_json::from_slice(data)?;
    let ip: IpAddr = raw
        .udp_ip
        .parse()
        .map_err(|_| CodecError::InvalidAddress(raw.udp_ip.clone()))?;

    Ok(ControlRequest {
        kind: raw.request.into(),
        content_type: raw.shape,
        callback: Endpoint::new(ip, raw.udp_port),
    })
}

/// Classify a datagram received on a subscriber's unicast socket
pub fn decode_inbound(data: &[u8]) -> Result<Inbound, CodecError> {
    if is_ack(data) {
        return Ok(Inbound::Ack);
    }
    decode(data).map(Inbound::Notification)
}

pub fn is_ack(data: &[u8]) -> bool {
    data == ACK_MARKER
}

#[cfg(test)]
mod tests {
    use std::net::Ipv4Addr;

    use serde_json::json;

    use super::*;
    use crate::protocol::message::RequestKind;

    #[test]
    fn test_round_trip_known_types() {
        let cases = [
            (ContentType::SQUARE, vec![json!(4), json!(4), json!("green")]),
            (ContentType::CIRCLE, vec![json!(5), json!("blue")]),
            (ContentType::TRIANGLE, vec![json!(4), json!(4), json!("cyan")]),
        ];

        for (ty, params) in cases {
            let bytes = encode(ty, &params).unwrap();
            let decoded = decode(&bytes).unwrap();
            assert_eq!(decoded.content_type, ty);
            assert_eq!(decoded.params, params);
        }
    }

    #[test]
    fn test_notification_wire_layout() {
        let bytes = encode(ContentType::CIRCLE, &[json!(5), json!("blue")]).unwrap();
        let value: Value = serde_json::from_slice(&bytes).unwrap();
        assert_eq!(value, json!({"type": 1, "params": [5, "blue"]}));
    }

    #[test]
    fn test_request_wire_layout() {
        let callback = Endpoint::new(IpAddr::V4(Ipv4Addr::new(10, 0, 0, 7)), 9998);
        let bytes = encode_request(&ControlRequest::register(ContentType::SQUARE, callback)).unwrap();
        let value: Value = serde_json::from_slice(&bytes).unwrap();
        assert_eq!(
            value,
            json!({"request": "register", "shape": 2, "udp_port": 9998, "udp_ip": "10.0.0.7"})
        );

        let decoded = decode_request(&bytes).unwrap();
        assert_eq!(decoded.kind, RequestKind::Register);
        assert_eq!(decoded.callback, callback);
    }

    #[test]
    fn test_decode_request_unknown_tag() {
        let data = br#"{"request":"subscribe","shape":1,"udp_port":5000,"udp_ip":"127.0.0.1"}"#;
        let decoded = decode_request(data).unwrap();
        assert_eq!(decoded.kind, RequestKind::Other("subscribe".into()));
        assert_eq!(decoded.callback.port, 5000);
    }

    #[test]
    fn test_decode_request_rejects_garbage() {
        assert!(matches!(
            decode_request(b"not json"),
            Err(CodecError::Malformed(_))
        ));
        assert!(matches!(
            decode_request(br#"{"request":"register","shape":1}"#),
            Err(CodecError::Malformed(_))
        ));

        let bad_ip = br#"{"request":"register","shape":1,"udp_port":1,"udp_ip":"nowhere"}"#;
        assert!(matches!(
            decode_request(bad_ip),
            Err(CodecError::InvalidAddress(ip)) if ip == "nowhere"
        ));
    }

    #[test]
    fn test_decode_inbound() {
        assert_eq!(decode_inbound(b"ACK").unwrap(), Inbound::Ack);

        let bytes = encode(ContentType::SQUARE, &[json!(1), json!(2), json!("red")]).unwrap();
        match decode_inbound(&bytes).unwrap() {
            Inbound::Notification(n) => assert_eq!(n.content_type, ContentType::SQUARE),
            other => panic!("unexpected {:?}", other),
        }

        assert!(decode_inbound(b"ACKNOWLEDGED").is_err());
    }
}
