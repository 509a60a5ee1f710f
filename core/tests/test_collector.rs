#[cfg(test)]
mod tests {
    use std::collections::BTreeMap;
    use std::net::SocketAddr;
    use std::path::Path;
    use std::sync::atomic::{AtomicBool, Ordering};
    use std::thread;
    use std::time::{Duration, Instant};

    use bytes::Bytes;
    use netcap_core::collector::{Collector, DemuxError, Demultiplexer};
    use netcap_core::config::CollectorConfig;
    use netcap_core::container::ContainerReader;
    use netcap_core::crypto::KeyPair;
    use netcap_core::framing::encode_frame;
    use netcap_core::lifecycle::{HandleOptions, HandleRegistry};
    use netcap_core::records::{Batch, RecordType};
    use netcap_core::transport::{BatchHandler, TransportSender};
    use tempfile::tempdir;

    fn peer() -> SocketAddr {
        "127.0.0.1:9".parse().unwrap()
    }

    fn batch(client: &str, t: RecordType, frames: &[String]) -> Batch {
        let data: Vec<u8> = frames.iter().flat_map(|f| encode_frame(f.as_bytes()).unwrap()).collect();
        Batch {
            client_id: client.into(),
            message_type: t.tag(),
            size: data.len() as i32,
            data: Bytes::from(data),
            contains_payloads: false,
        }
    }

    fn demux(dir: &Path) -> Demultiplexer {
        Demultiplexer::new(HandleRegistry::new(HandleOptions {
            out_dir: dir.to_path_buf(),
            buffer: true,
            compress: true,
            buffer_size: 4096,
        }))
    }

    fn read_frames(path: &Path) -> Vec<String> {
        let mut r = ContainerReader::open(path).unwrap();
        r.read_header().unwrap();
        let mut out = Vec::new();
        while let Some(f) = r.next_frame().unwrap() {
            out.push(String::from_utf8(f.to_vec()).unwrap());
        }
        out
    }

    // # ✅ 1. Routing

    #[test]
    fn interleaved_batches_land_in_their_own_containers() {
        let dir = tempdir().unwrap();
        let d = demux(dir.path());

        let keys = [
            ("alpha", RecordType::TCP),
            ("alpha", RecordType::DNS),
            ("beta", RecordType::TCP),
        ];
        let mut expected: BTreeMap<(String, RecordType), Vec<String>> = BTreeMap::new();

        // round-robin across keys, three frames per batch
        for round in 0..7 {
            for (client, t) in keys {
                let frames: Vec<String> = (0..3).map(|i| format!("{}-{}-{}-{}", client, t, round, i)).collect();
                let delivery = d.handle(peer(), batch(client, t, &frames)).unwrap();
                assert_eq!(delivery.frames, 3);
                assert_eq!(delivery.opened, round == 0);
                expected.entry((client.to_string(), t)).or_default().extend(frames);
            }
        }

        assert_eq!(d.registry().len(), 3);
        let report = d.registry().close_all();
        assert!(report.is_ok());
        assert_eq!(report.closed.len(), 3);

        for ((client, t), frames) in expected {
            let path = dir.path().join(&client).join(format!("{}.ncap.gz", t.name()));
            assert_eq!(read_frames(&path), frames);
        }
    }

    #[test]
    fn invalid_batches_are_rejected_without_files() {
        let dir = tempdir().unwrap();
        let d = demux(dir.path());
        let frames = vec!["x".to_string()];

        let mut unknown = batch("c", RecordType::TCP, &frames);
        unknown.message_type = 4242;
        assert!(matches!(d.route(&unknown), Err(DemuxError::Record(_))));

        let meta = batch("c", RecordType::Header, &frames);
        assert!(matches!(d.route(&meta), Err(DemuxError::MetaType(_))));

        let mut lying = batch("c", RecordType::TCP, &frames);
        lying.size += 1;
        assert!(matches!(d.route(&lying), Err(DemuxError::SizeMismatch { .. })));

        let mut partial = batch("c", RecordType::TCP, &frames);
        let cut = partial.data.slice(..partial.data.len() - 1);
        partial.size = cut.len() as i32;
        partial.data = cut;
        assert!(matches!(d.route(&partial), Err(DemuxError::Frames(_))));

        let escape = batch("../up", RecordType::TCP, &frames);
        assert!(matches!(d.route(&escape), Err(DemuxError::Lifecycle(_))));

        assert!(d.registry().is_empty());
    }

    #[test]
    fn empty_batch_opens_nothing() {
        let dir = tempdir().unwrap();
        let d = demux(dir.path());
        let delivery = d.route(&batch("c", RecordType::TCP, &[])).unwrap();
        assert_eq!(delivery.frames, 0);
        assert!(d.registry().is_empty());
    }

    // # ✅ 2. End to end: sender → collector → disk

    #[test]
    fn collector_persists_and_survives_shutdown() {
        let dir = tempdir().unwrap();
        let collector_keys = KeyPair::generate();
        let cfg = CollectorConfig {
            listen_addr: "127.0.0.1:0".into(),
            out_dir: dir.path().to_path_buf(),
            workers: 2,
            ..CollectorConfig::default()
        };
        let collector = Collector::bind(&cfg, collector_keys.clone()).unwrap();
        let addr = collector.local_addr().unwrap();
        let sender = TransportSender::connect(&addr.to_string(), KeyPair::generate(), *collector_keys.public()).unwrap();
        let running = AtomicBool::new(true);

        let report = thread::scope(|s| {
            let server = s.spawn(|| collector.run(&running));

            for round in 0..4 {
                for t in [RecordType::TCP, RecordType::HTTP] {
                    let frames: Vec<String> = (0..2).map(|i| format!("{}-{}-{}", t, round, i)).collect();
                    sender.send(&batch("remote", t, &frames)).unwrap();
                    // one in flight per key keeps per-key order deterministic
                    thread::sleep(Duration::from_millis(20));
                }
            }

            let deadline = Instant::now() + Duration::from_secs(5);
            while collector.demux().registry().len() < 2 && Instant::now() < deadline {
                thread::sleep(Duration::from_millis(10));
            }
            thread::sleep(Duration::from_millis(200));
            // what the signal handler does
            running.store(false, Ordering::SeqCst);
            server.join().unwrap()
        });

        assert!(report.close.is_ok());
        assert_eq!(report.telemetry.counters.batches_appended, 8);
        assert_eq!(report.telemetry.counters.frames_appended, 16);
        assert_eq!(report.telemetry.counters.handles_opened, 2);

        for t in [RecordType::TCP, RecordType::HTTP] {
            let path = dir.path().join("remote").join(format!("{}.ncap.gz", t.name()));
            let expected: Vec<String> =
                (0..4).flat_map(|round| (0..2).map(move |i| format!("{}-{}-{}", t, round, i))).collect();
            assert_eq!(read_frames(&path), expected);
        }
    }
}
