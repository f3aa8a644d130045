// Frame decoding: Ethernet + IPv4 + TCP header walk.
//
// Every header-field read is a bounds-checked slice read, and header-declared
// lengths are clamped against the captured buffer before any access. Frames
// that are not IPv4/TCP, are truncated at any layer, or carry too short a
// payload degrade to `NotApplicable` — never a panic, never a fatal error.

// ---------------------------------------------------------------------------
// Constants
// ---------------------------------------------------------------------------

// Ethernet
pub const ETH_HLEN: usize = 14;
const ETHERTYPE_OFFSET: usize = 12;
const ETHERTYPE_IPV4: u16 = 0x0800;

// IPv4
const IPV4_MIN_HLEN: usize = 20;
const IPV4_TOTAL_LEN_OFFSET: usize = 2;
const IPV4_PROTO_OFFSET: usize = 9;
const PROTO_TCP: u8 = 6;

// TCP
const TCP_MIN_HLEN: usize = 20;
const TCP_DATA_OFFSET_OFFSET: usize = 12;

/// Default payload floor: no valid HTTP request line is shorter than 7 bytes.
pub const MIN_HTTP_PAYLOAD: usize = 7;

// ---------------------------------------------------------------------------
// Decode outcome
// ---------------------------------------------------------------------------

/// Reason a frame was filtered out.
///
/// This is the normal path for most traffic, not an error: the caller simply
/// skips the frame. The variants exist so tests and trace logging can tell
/// the filter outcomes apart.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NotApplicable {
    /// Buffer ends before a header it claims to carry, or the IP total
    /// length is smaller than the combined header lengths.
    Truncated,
    /// EtherType is not 0x0800.
    NotIpv4,
    /// IP protocol is not 6 (TCP).
    NotTcp,
    /// Declared TCP payload is shorter than the configured floor.
    PayloadTooShort,
}

/// Header fields derived from one frame.
///
/// Computed fresh per frame and never cached; two decodes of the same buffer
/// yield equal values.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ParsedHeaders {
    /// EtherType from the Ethernet header (always 0x0800 on success).
    pub ethertype: u16,
    /// IP protocol field (always 6 on success).
    pub ip_protocol: u8,
    /// IP header length in bytes (IHL field * 4).
    pub ip_header_len: usize,
    /// TCP header length in bytes (data-offset field * 4).
    pub tcp_header_len: usize,
    /// Byte offset of the TCP payload from the start of the frame.
    pub payload_offset: usize,
    /// TCP payload length declared by the IP header. May exceed the number
    /// of bytes actually captured; see [`PayloadWindow::from_frame`].
    pub payload_len: usize,
}

// ---------------------------------------------------------------------------
// Decoding
// ---------------------------------------------------------------------------

/// Decodes an Ethernet frame down to its TCP payload window.
///
/// `min_payload` is the declared-payload floor below which the frame is
/// filtered out (callers normally pass the configured value, default
/// [`MIN_HTTP_PAYLOAD`]).
///
/// Header length fields are stored as 32-bit-word counts in both the IPv4
/// and TCP headers; the multiply-by-4 converting them to byte counts is a
/// fixed property of those formats.
pub fn decode(frame: &[u8], min_payload: usize) -> Result<ParsedHeaders, NotApplicable> {
    if frame.len() < ETH_HLEN {
        return Err(NotApplicable::Truncated);
    }
    let ethertype = u16::from_be_bytes([frame[ETHERTYPE_OFFSET], frame[ETHERTYPE_OFFSET + 1]]);
    if ethertype != ETHERTYPE_IPV4 {
        return Err(NotApplicable::NotIpv4);
    }

    let ip = &frame[ETH_HLEN..];
    if ip.len() < IPV4_MIN_HLEN {
        return Err(NotApplicable::Truncated);
    }
    let ip_header_len = ((ip[0] & 0x0F) as usize) * 4;
    if ip_header_len < IPV4_MIN_HLEN || ip.len() < ip_header_len {
        return Err(NotApplicable::Truncated);
    }
    let ip_protocol = ip[IPV4_PROTO_OFFSET];
    if ip_protocol != PROTO_TCP {
        return Err(NotApplicable::NotTcp);
    }
    let ip_total_len =
        u16::from_be_bytes([ip[IPV4_TOTAL_LEN_OFFSET], ip[IPV4_TOTAL_LEN_OFFSET + 1]]) as usize;

    let tcp = &ip[ip_header_len..];
    if tcp.len() < TCP_MIN_HLEN {
        return Err(NotApplicable::Truncated);
    }
    let tcp_header_len = ((tcp[TCP_DATA_OFFSET_OFFSET] >> 4) as usize) * 4;
    if tcp_header_len < TCP_MIN_HLEN || tcp.len() < tcp_header_len {
        return Err(NotApplicable::Truncated);
    }

    // A total length smaller than the combined header lengths is a header
    // inconsistency; it degrades to Truncated rather than underflowing.
    let payload_len = match ip_total_len.checked_sub(ip_header_len + tcp_header_len) {
        Some(n) => n,
        None => return Err(NotApplicable::Truncated),
    };
    if payload_len < min_payload {
        return Err(NotApplicable::PayloadTooShort);
    }

    Ok(ParsedHeaders {
        ethertype,
        ip_protocol,
        ip_header_len,
        tcp_header_len,
        payload_offset: ETH_HLEN + ip_header_len + tcp_header_len,
        payload_len,
    })
}

// ---------------------------------------------------------------------------
// PayloadWindow
// ---------------------------------------------------------------------------

/// Bounded read-only view of a TCP payload.
///
/// `bytes` never extends past the captured buffer, even when the IP header
/// declares a longer payload than was captured (short snaplen). The declared
/// length is kept separately for the payload-length counter dimension and for
/// the partial-capture floor check.
#[derive(Debug, Clone, Copy)]
pub struct PayloadWindow<'a> {
    bytes: &'a [u8],
    declared_len: usize,
}

impl<'a> PayloadWindow<'a> {
    /// Window over the payload of a decoded frame, clamped to captured bytes.
    pub fn from_frame(frame: &'a [u8], headers: &ParsedHeaders) -> Self {
        let start = headers.payload_offset.min(frame.len());
        let end = headers
            .payload_offset
            .saturating_add(headers.payload_len)
            .min(frame.len());
        Self {
            bytes: &frame[start..end],
            declared_len: headers.payload_len,
        }
    }

    /// Window over a partial capture: the first bytes of a payload plus the
    /// length the capture source declared for the whole payload. Used when
    /// the source hands over only a small signature-prefix copy (4-7 bytes)
    /// instead of the full frame.
    pub fn from_prefix(bytes: &'a [u8], declared_len: usize) -> Self {
        let cap = declared_len.min(bytes.len());
        Self {
            bytes: &bytes[..cap],
            declared_len,
        }
    }

    pub fn bytes(&self) -> &'a [u8] {
        self.bytes
    }

    /// Payload length declared by the headers (may exceed `bytes().len()`).
    pub fn declared_len(&self) -> usize {
        self.declared_len
    }

    pub fn len(&self) -> usize {
        self.bytes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bytes.is_empty()
    }
}

// ===========================================================================
// Unit tests
// ===========================================================================
