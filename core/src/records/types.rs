use std::fmt;
use std::str::FromStr;

use num_enum::{IntoPrimitive, TryFromPrimitive};
use thiserror::Error;

use crate::constants::TYPE_PREFIX;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum RecordError {
    #[error("unknown record type tag: {0}")]
    UnknownType(i32),
    #[error("unknown record type name: {0:?}")]
    UnknownName(String),
}

macro_rules! record_types {
    ($($variant:ident = $tag:expr),+ $(,)?) => {
        /// Tag identifying the schema of the records in a container or batch.
        #[repr(i32)]
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, IntoPrimitive, TryFromPrimitive)]
        pub enum RecordType {
            $($variant = $tag),+
        }

        impl RecordType {
            pub const ALL: &'static [RecordType] = &[$(RecordType::$variant),+];

            /// Name without the `NC_` prefix, used for file names.
            pub const fn name(self) -> &'static str {
                match self {
                    $(RecordType::$variant => stringify!($variant)),+
                }
            }
        }
    };
}

record_types! {
    Header = 0,
    Batch = 1,
    Ethernet = 2,
    ARP = 3,
    Dot1Q = 4,
    Dot11 = 5,
    NortelDiscovery = 6,
    CiscoDiscovery = 7,
    CiscoDiscoveryInfo = 8,
    LinkLayerDiscovery = 9,
    LinkLayerDiscoveryInfo = 10,
    EthernetCTP = 11,
    EthernetCTPReply = 12,
    LLC = 13,
    SNAP = 14,
    EAP = 15,
    EAPOL = 16,
    EAPOLKey = 17,
    IPv4 = 18,
    IPv6 = 19,
    IPv6HopByHop = 20,
    IPv6Fragment = 21,
    IPSecAH = 22,
    IPSecESP = 23,
    GRE = 24,
    FDDI = 25,
    MPLS = 26,
    ICMPv4 = 27,
    ICMPv6 = 28,
    ICMPv6Echo = 29,
    ICMPv6NeighborSolicitation = 30,
    ICMPv6NeighborAdvertisement = 31,
    ICMPv6RouterSolicitation = 32,
    ICMPv6RouterAdvertisement = 33,
    IGMP = 34,
    OSPFv2 = 35,
    OSPFv3 = 36,
    VRRPv2 = 37,
    Geneve = 38,
    VXLAN = 39,
    UDP = 40,
    TCP = 41,
    SCTP = 42,
    DNS = 43,
    DHCPv4 = 44,
    DHCPv6 = 45,
    NTP = 46,
    SIP = 47,
    HTTP = 48,
    TLSClientHello = 49,
    TLSServerHello = 50,
    SSH = 51,
    SMTP = 52,
    POP3 = 53,
    Diameter = 54,
    BFD = 55,
    LCM = 56,
    USB = 57,
    USBRequestBlockSetup = 58,
    Modbus = 59,
    CIP = 60,
    ENIP = 61,
    Connection = 62,
    DeviceProfile = 63,
    IPProfile = 64,
    File = 65,
    Mail = 66,
    Software = 67,
    Service = 68,
    Credentials = 69,
    Vulnerability = 70,
    Exploit = 71,
    Alert = 72,
}

impl RecordType {
    /// Numeric tag as carried in `Header.record_type` / `Batch.message_type`.
    #[inline]
    pub fn tag(self) -> i32 {
        self.into()
    }

    #[inline]
    pub fn from_tag(tag: i32) -> Result<Self, RecordError> {
        RecordType::try_from_primitive(tag).map_err(|_| RecordError::UnknownType(tag))
    }

    /// Prefixed name, e.g. `NC_TCP`.
    pub fn wire_name(self) -> String {
        format!("{}{}", TYPE_PREFIX, self.name())
    }

    /// Header and Batch describe the format itself and never name a container.
    pub fn is_meta(self) -> bool {
        matches!(self, RecordType::Header | RecordType::Batch)
    }
}

impl fmt::Display for RecordType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Accepts both `TCP` and `NC_TCP`.
impl FromStr for RecordType {
    type Err = RecordError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let bare = s.strip_prefix(TYPE_PREFIX).unwrap_or(s);
        RecordType::ALL
            .iter()
            .copied()
            .find(|t| t.name() == bare)
            .ok_or_else(|| RecordError::UnknownName(s.to_string()))
    }
}
