//! The fixed login handshake sent by every probe.

/// Datagram payload sent to a server to provoke a login reply.
///
/// The bytes are an external contract with deployed servers and must be
/// reproduced exactly. They carry no valid credentials.
pub const FAKE_LOGIN_PACKET: [u8; 84] = [
    0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x01, 0x00, 0x93, 0x00, //
    0xd0, 0x05, 0x00, 0x00, 0x00, 0x00, 0x40, 0x00, 0x00, 0x00, //
    0x04, 0x00, 0x31, 0x38, 0x30, 0x32, 0x00, 0x00, 0x34, 0x00, //
    0x00, 0x00, 0x01, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, //
    0x3e, 0xb8, 0xa8, 0x58, 0x1c, 0x00, 0x61, 0x63, 0x73, 0x65, //
    0x72, 0x76, 0x65, 0x72, 0x74, 0x72, 0x61, 0x63, 0x6b, 0x65, //
    0x72, 0x3a, 0x6a, 0x6a, 0x39, 0x68, 0x32, 0x36, 0x68, 0x63, //
    0x73, 0x67, 0x67, 0x63, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, //
    0x00, 0x00, 0x00, 0x00,
];

/// Reply lengths, in bytes, that identify a live server.
///
/// Each length corresponds to a different emulator's reply format. The reply
/// payload itself is never decoded.
pub const ACCEPTED_REPLY_LENGTHS: [usize; 3] = [28, 44, 52];

/// Receive buffer size for reply datagrams.
pub const MAX_REPLY_SIZE: usize = 1024;

/// Returns whether a reply of `length` bytes marks the server as up.
#[must_use]
pub fn is_accepted_reply(length: usize) -> bool {
    ACCEPTED_REPLY_LENGTHS.contains(&length)
}
