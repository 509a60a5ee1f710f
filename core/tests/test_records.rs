#[cfg(test)]
mod tests {
    use bytes::Bytes;
    use netcap_core::constants::FORMAT_VERSION;
    use netcap_core::records::{Batch, Header, RecordError, RecordType};
    use prost::Message;

    #[test]
    fn names_strip_prefix() {
        assert_eq!(RecordType::TCP.name(), "TCP");
        assert_eq!(RecordType::TCP.wire_name(), "NC_TCP");
        assert_eq!(RecordType::TLSClientHello.to_string(), "TLSClientHello");
    }

    #[test]
    fn parse_accepts_both_forms() {
        assert_eq!("TCP".parse::<RecordType>().unwrap(), RecordType::TCP);
        assert_eq!("NC_DNS".parse::<RecordType>().unwrap(), RecordType::DNS);
        assert!(matches!("NC_Nope".parse::<RecordType>(), Err(RecordError::UnknownName(_))));
    }

    #[test]
    fn tags_roundtrip_and_unknown_rejected() {
        for t in RecordType::ALL {
            assert_eq!(RecordType::from_tag(t.tag()).unwrap(), *t);
        }
        assert_eq!(RecordType::from_tag(9999), Err(RecordError::UnknownType(9999)));
        assert_eq!(RecordType::from_tag(-1), Err(RecordError::UnknownType(-1)));
    }

    #[test]
    fn meta_types() {
        assert!(RecordType::Header.is_meta());
        assert!(RecordType::Batch.is_meta());
        assert!(!RecordType::Ethernet.is_meta());
    }

    #[test]
    fn header_fields() {
        let h = Header::new(RecordType::HTTP, "eth0", true);
        assert_eq!(h.kind().unwrap(), RecordType::HTTP);
        assert_eq!(h.input_source, "eth0");
        assert_eq!(h.version, FORMAT_VERSION);
        assert!(h.contains_payloads);
        assert!(h.created > 0);

        let decoded = Header::decode(h.encode_to_vec().as_slice()).unwrap();
        assert_eq!(decoded, h);
    }

    #[test]
    fn batch_consistency() {
        let mut b = Batch {
            client_id: "sensor-1".into(),
            message_type: RecordType::UDP.tag(),
            data: Bytes::from_static(b"\x03abc"),
            size: 4,
            contains_payloads: false,
        };
        assert!(b.is_consistent());
        b.size = 5;
        assert!(!b.is_consistent());
        b.size = -1;
        assert!(!b.is_consistent());
    }
}
