#[cfg(test)]
mod tests {
    use std::fs;
    use std::path::Path;

    use netcap_core::container::{count_records, AuditRecordWriter, ContainerError, ContainerReader, WriterConfig};
    use netcap_core::framing::split_frames;
    use netcap_core::records::{Header, RecordType};
    use proptest::prelude::*;
    use tempfile::tempdir;

    fn file_cfg(dir: &Path, buffer: bool, compress: bool) -> WriterConfig {
        WriterConfig {
            name: "TCP".into(),
            buffer,
            compress,
            out_dir: dir.to_path_buf(),
            buffer_size: 64,
            source: "test".into(),
            ..WriterConfig::default()
        }
    }

    fn records(n: usize) -> Vec<Vec<u8>> {
        (0..n).map(|i| format!("record-{}-{}", i, "x".repeat(i % 17)).into_bytes()).collect()
    }

    fn write_all(cfg: WriterConfig, recs: &[Vec<u8>]) -> std::path::PathBuf {
        let mut w = AuditRecordWriter::new(cfg).unwrap();
        w.write_header(RecordType::TCP).unwrap();
        for r in recs {
            w.write(r).unwrap();
        }
        let summary = w.close().unwrap();
        assert_eq!(summary.records, recs.len() as u64);
        summary.path.unwrap()
    }

    fn read_all(path: &Path) -> (Header, Vec<Vec<u8>>) {
        let mut r = ContainerReader::open(path).unwrap();
        let header = r.read_header().unwrap();
        let mut out = Vec::new();
        while let Some(f) = r.next_frame().unwrap() {
            out.push(f.to_vec());
        }
        // exhaustion is sticky and never an error
        assert!(r.next_frame().unwrap().is_none());
        assert!(r.next_frame().unwrap().is_none());
        (header, out)
    }

    // # ✅ 1. Round-trip across every writer stack

    #[test]
    fn roundtrip_all_stacks() {
        let recs = records(50);
        for &(buffer, compress) in &[(false, false), (true, false), (false, true), (true, true)] {
            let dir = tempdir().unwrap();
            let path = write_all(file_cfg(dir.path(), buffer, compress), &recs);

            let expected_name = if compress { "TCP.ncap.gz" } else { "TCP.ncap" };
            assert_eq!(path.file_name().unwrap(), expected_name);

            let (header, got) = read_all(&path);
            assert_eq!(header.kind().unwrap(), RecordType::TCP);
            assert_eq!(header.input_source, "test");
            assert_eq!(got, recs, "buffer={} compress={}", buffer, compress);
            assert_eq!(count_records(&path).unwrap(), 50);
        }
    }

    #[test]
    fn decode_into_caller_record() {
        let dir = tempdir().unwrap();
        let mut w = AuditRecordWriter::new(file_cfg(dir.path(), true, true)).unwrap();
        w.write_header(RecordType::TCP).unwrap();
        // Any prost message works as a record; reuse Header for convenience.
        let a = Header::new(RecordType::TCP, "a", false);
        let b = Header::new(RecordType::UDP, "b", true);
        w.write_message(&a).unwrap();
        w.write_message(&b).unwrap();
        let path = w.close().unwrap().path.unwrap();

        let mut r = ContainerReader::open(&path).unwrap();
        r.read_header().unwrap();
        let mut rec = Header::default();
        assert!(r.next(&mut rec).unwrap());
        assert_eq!(rec, a);
        assert!(r.next(&mut rec).unwrap());
        assert_eq!(rec, b);
        assert!(!r.next(&mut rec).unwrap());
        r.close().unwrap();
    }

    // # ✅ 2. Truncation and corruption

    #[test]
    fn truncated_tail_is_end_of_data() {
        let dir = tempdir().unwrap();
        let recs = records(5);
        let path = write_all(file_cfg(dir.path(), false, false), &recs);

        let bytes = fs::read(&path).unwrap();
        fs::write(&path, &bytes[..bytes.len() - 3]).unwrap();

        let mut r = ContainerReader::open(&path).unwrap();
        r.read_header().unwrap();
        let mut n = 0;
        while r.next_frame().unwrap().is_some() {
            n += 1;
        }
        assert_eq!(n, 4);
        assert!(r.truncated());
    }

    #[test]
    fn missing_header_is_fatal() {
        let dir = tempdir().unwrap();
        let empty = dir.path().join("empty.ncap");
        fs::write(&empty, b"").unwrap();
        let mut r = ContainerReader::open(&empty).unwrap();
        assert!(matches!(r.read_header(), Err(ContainerError::InvalidHeader { .. })));

        let junk = dir.path().join("junk.ncap");
        fs::write(&junk, [0x05, 0xff, 0xff, 0xff, 0xff, 0xff]).unwrap();
        let mut r = ContainerReader::open(&junk).unwrap();
        assert!(matches!(r.read_header(), Err(ContainerError::InvalidHeader { .. })));
    }

    #[test]
    fn header_with_meta_type_is_rejected() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("meta.ncap");
        let mut bytes = Vec::new();
        netcap_core::framing::write_frame(&mut bytes, &prost::Message::encode_to_vec(&Header::new(RecordType::Batch, "x", false))).unwrap();
        fs::write(&path, bytes).unwrap();

        let mut r = ContainerReader::open(&path).unwrap();
        assert!(matches!(r.read_header(), Err(ContainerError::InvalidHeader { .. })));
    }

    #[test]
    fn frames_before_header_refused() {
        let dir = tempdir().unwrap();
        let path = write_all(file_cfg(dir.path(), false, false), &records(1));
        let mut r = ContainerReader::open(&path).unwrap();
        assert!(matches!(r.next_frame(), Err(ContainerError::HeaderNotRead)));
    }

    // # ✅ 3. Writer contract

    #[test]
    fn channel_with_buffer_or_compress_fails_fast() {
        for &(buffer, compress) in &[(true, false), (false, true), (true, true)] {
            let cfg = WriterConfig { name: "TCP".into(), as_channel: true, buffer, compress, ..WriterConfig::default() };
            assert!(matches!(AuditRecordWriter::new(cfg), Err(ContainerError::Config(_))));
        }
    }

    #[test]
    fn header_exactly_once_before_writes() {
        let dir = tempdir().unwrap();
        let mut w = AuditRecordWriter::new(file_cfg(dir.path(), false, false)).unwrap();
        assert!(matches!(w.write(b"early"), Err(ContainerError::HeaderNotWritten)));
        w.write_header(RecordType::TCP).unwrap();
        assert!(matches!(w.write_header(RecordType::TCP), Err(ContainerError::HeaderAlreadyWritten)));
        w.write(b"ok").unwrap();
        w.close().unwrap();
    }

    #[test]
    fn empty_container_removed_on_close() {
        let dir = tempdir().unwrap();
        let mut w = AuditRecordWriter::new(file_cfg(dir.path(), true, true)).unwrap();
        w.write_header(RecordType::TCP).unwrap();
        let path = w.path().unwrap().to_path_buf();
        assert!(path.exists());

        let summary = w.close().unwrap();
        assert!(summary.removed);
        assert!(!path.exists());
    }

    #[test]
    fn raw_append_keeps_frames_intact() {
        let dir = tempdir().unwrap();
        let mut w = AuditRecordWriter::new(file_cfg(dir.path(), true, true)).unwrap();
        w.write_header(RecordType::TCP).unwrap();

        let mut framed = netcap_core::framing::encode_frame(b"first").unwrap();
        framed.extend(netcap_core::framing::encode_frame(b"second").unwrap());
        w.write_raw(&framed, 2).unwrap();
        w.write(b"third").unwrap();
        let summary = w.close().unwrap();
        assert_eq!(summary.records, 3);

        let (_, got) = read_all(&summary.path.unwrap());
        assert_eq!(got, vec![b"first".to_vec(), b"second".to_vec(), b"third".to_vec()]);
    }

    #[test]
    fn channel_writer_emits_token_then_payload() {
        let cfg = WriterConfig {
            name: "DNS".into(),
            buffer: false,
            compress: false,
            as_channel: true,
            ..WriterConfig::default()
        };
        let mut w = AuditRecordWriter::new(cfg).unwrap();
        let rx = w.chunks().unwrap();
        assert!(w.path().is_none());
        assert!(w.header().is_none());

        w.write_header(RecordType::DNS).unwrap();
        // kept locally, never sent
        assert_eq!(w.header().unwrap().kind().unwrap(), RecordType::DNS);
        w.write(b"abc").unwrap();
        w.write(&[9u8; 200]).unwrap();
        let summary = w.close().unwrap();
        assert_eq!(summary.records, 2);

        let chunks: Vec<_> = rx.iter().collect();
        assert_eq!(chunks.len(), 4);
        assert_eq!(&chunks[0][..], &[3u8]);
        assert_eq!(&chunks[1][..], b"abc");
        assert_eq!(&chunks[2][..], &[200u8, 1]);
        assert_eq!(chunks[3].len(), 200);

        let joined: Vec<u8> = chunks.iter().flat_map(|c| c.iter().copied()).collect();
        assert_eq!(split_frames(&joined).unwrap().len(), 2);
    }

    proptest! {
        #![proptest_config(ProptestConfig::with_cases(24))]

        #[test]
        fn prop_roundtrip(recs in prop::collection::vec(prop::collection::vec(any::<u8>(), 0..512), 1..40),
                          buffer in any::<bool>(), compress in any::<bool>()) {
            let dir = tempdir().unwrap();
            let path = write_all(file_cfg(dir.path(), buffer, compress), &recs);
            let (_, got) = read_all(&path);
            prop_assert_eq!(got, recs);
        }
    }
}
