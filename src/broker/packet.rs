//! Minimal MQTT 3.1.1 packet encoding: CONNECT, PUBLISH (QoS 0), DISCONNECT.

const PROTOCOL_NAME: &str = "MQTT";
const PROTOCOL_LEVEL_3_1_1: u8 = 4;
const CONNECT_PACKET_TYPE: u8 = 0x10;
const CONNACK_PACKET_TYPE: u8 = 0x20;
const PUBLISH_PACKET_TYPE_QOS0: u8 = 0x30;
const DISCONNECT_PACKET_TYPE: u8 = 0xE0;
const CLEAN_SESSION_FLAG: u8 = 0x02;
const USERNAME_FLAG: u8 = 0x80;
const PASSWORD_FLAG: u8 = 0x40;
const KEEPALIVE_SECS: u16 = 20;
pub(super) const CONNACK_ACCEPTED: u8 = 0x00;

pub(super) fn connect(client_id: &str, username: Option<&str>, password: Option<&str>) -> Vec<u8> {
    let mut connect_flags = CLEAN_SESSION_FLAG;
    if username.is_some() {
        connect_flags |= USERNAME_FLAG;
    }
    if password.is_some() {
        connect_flags |= PASSWORD_FLAG;
    }

    let mut variable_header = Vec::with_capacity(10);
    push_utf8(&mut variable_header, PROTOCOL_NAME);
    variable_header.push(PROTOCOL_LEVEL_3_1_1);
    variable_header.push(connect_flags);
    variable_header.extend_from_slice(&KEEPALIVE_SECS.to_be_bytes());

    let mut payload = Vec::new();
    push_utf8(&mut payload, client_id);
    if let Some(username) = username {
        push_utf8(&mut payload, username);
    }
    if let Some(password) = password {
        push_utf8(&mut payload, password);
    }

    let remaining_len = variable_header.len().saturating_add(payload.len());
    let mut packet = Vec::with_capacity(remaining_len.saturating_add(5));
    packet.push(CONNECT_PACKET_TYPE);
    encode_remaining_length(&mut packet, remaining_len);
    packet.extend_from_slice(&variable_header);
    packet.extend_from_slice(&payload);
    packet
}

pub(super) fn publish(topic: &str, payload: &[u8]) -> Vec<u8> {
    let remaining_len = 2_usize
        .saturating_add(topic.len())
        .saturating_add(payload.len());
    let mut packet = Vec::with_capacity(remaining_len.saturating_add(5));
    packet.push(PUBLISH_PACKET_TYPE_QOS0);
    encode_remaining_length(&mut packet, remaining_len);
    push_utf8(&mut packet, topic);
    packet.extend_from_slice(payload);
    packet
}

pub(super) fn disconnect() -> [u8; 2] {
    [DISCONNECT_PACKET_TYPE, 0x00]
}

/// A CONNACK is exactly 4 bytes; byte 3 carries the return code.
pub(super) fn connack_return_code(packet: [u8; 4]) -> Option<u8> {
    let [packet_type, remaining_len, _, return_code] = packet;
    if packet_type != CONNACK_PACKET_TYPE || remaining_len != 2 {
        return None;
    }
    Some(return_code)
}

fn push_utf8(buffer: &mut Vec<u8>, value: &str) {
    let max_len = usize::from(u16::MAX);
    let len = value.len().min(max_len);
    let len_u16 = u16::try_from(len).unwrap_or(u16::MAX);
    buffer.extend_from_slice(&len_u16.to_be_bytes());
    if let Some(slice) = value.as_bytes().get(..len) {
        buffer.extend_from_slice(slice);
    }
}

fn encode_remaining_length(out: &mut Vec<u8>, mut len: usize) {
    loop {
        let mut byte = u8::try_from(len % 128).unwrap_or(127);
        len /= 128;
        if len > 0 {
            byte |= 0x80;
        }
        out.push(byte);
        if len == 0 {
            break;
        }
    }
}
