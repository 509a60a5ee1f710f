#[cfg(test)]
mod tests {
    use std::sync::{Arc, Barrier};
    use std::thread;

    use netcap_core::container::ContainerReader;
    use netcap_core::framing::encode_frame;
    use netcap_core::lifecycle::{validate_client_id, HandleOptions, HandleRegistry, LifecycleError, StreamKey};
    use netcap_core::records::RecordType;
    use tempfile::tempdir;

    fn registry(dir: &std::path::Path) -> HandleRegistry {
        HandleRegistry::new(HandleOptions { out_dir: dir.to_path_buf(), buffer: true, compress: true, buffer_size: 4096 })
    }

    fn frames(prefix: &str, n: usize) -> Vec<u8> {
        (0..n).flat_map(|i| encode_frame(format!("{}-{}", prefix, i).as_bytes()).unwrap()).collect()
    }

    fn read_frames(path: &std::path::Path) -> Vec<String> {
        let mut r = ContainerReader::open(path).unwrap();
        r.read_header().unwrap();
        let mut out = Vec::new();
        while let Some(f) = r.next_frame().unwrap() {
            out.push(String::from_utf8(f.to_vec()).unwrap());
        }
        out
    }

    #[test]
    fn get_or_create_caches_and_lays_out_paths() {
        let dir = tempdir().unwrap();
        let reg = registry(dir.path());
        let key = StreamKey::new("sensor-a", RecordType::TCP);

        let (h1, created) = reg.get_or_create(&key, false).unwrap();
        assert!(created);
        let (h2, created) = reg.get_or_create(&key, false).unwrap();
        assert!(!created);
        assert!(Arc::ptr_eq(&h1, &h2));
        assert_eq!(reg.len(), 1);

        let path = h1.lock().unwrap().path().unwrap().to_path_buf();
        assert_eq!(path, dir.path().join("sensor-a").join("TCP.ncap.gz"));
    }

    #[test]
    fn appends_survive_close_all_with_header() {
        let dir = tempdir().unwrap();
        let reg = registry(dir.path());
        let key = StreamKey::new("sensor-a", RecordType::DNS);

        let (h, _) = reg.get_or_create(&key, true).unwrap();
        reg.append(&h, &frames("a", 3), 3).unwrap();
        reg.append(&h, &frames("b", 2), 2).unwrap();

        let report = reg.close_all();
        assert!(report.is_ok());
        assert_eq!(report.records(), 5);

        let path = dir.path().join("sensor-a/DNS.ncap.gz");
        let mut r = ContainerReader::open(&path).unwrap();
        let header = r.read_header().unwrap();
        assert_eq!(header.kind().unwrap(), RecordType::DNS);
        assert_eq!(header.input_source, "sensor-a");
        assert!(header.contains_payloads);
        assert_eq!(read_frames(&path), vec!["a-0", "a-1", "a-2", "b-0", "b-1"]);
    }

    #[test]
    fn close_all_attempts_every_handle() {
        let dir = tempdir().unwrap();
        let reg = registry(dir.path());
        let keys: Vec<_> = ["c1", "c2", "c3"].iter().map(|c| StreamKey::new(*c, RecordType::UDP)).collect();
        for k in &keys {
            let (h, _) = reg.get_or_create(k, false).unwrap();
            reg.append(&h, &frames(&k.client_id, 1), 1).unwrap();
        }

        // close the middle handle behind the registry's back
        let (middle, _) = reg.get_or_create(&keys[1], false).unwrap();
        middle.lock().unwrap().close().unwrap();

        let report = reg.close_all();
        assert_eq!(report.closed.len(), 2);
        assert_eq!(report.failed.len(), 1);
        assert_eq!(report.failed[0].0, keys[1]);
        assert!(matches!(report.failed[0].1, LifecycleError::HandleClosed(_)));

        assert_eq!(read_frames(&dir.path().join("c1/UDP.ncap.gz")), vec!["c1-0"]);
        assert_eq!(read_frames(&dir.path().join("c3/UDP.ncap.gz")), vec!["c3-0"]);
    }

    #[test]
    fn registry_refuses_after_close() {
        let dir = tempdir().unwrap();
        let reg = registry(dir.path());
        reg.close_all();
        let key = StreamKey::new("late", RecordType::TCP);
        assert!(matches!(reg.get_or_create(&key, false), Err(LifecycleError::RegistryClosed)));
    }

    #[test]
    fn concurrent_appends_do_not_interleave() {
        let dir = tempdir().unwrap();
        let reg = registry(dir.path());
        let key = StreamKey::new("busy", RecordType::TCP);

        thread::scope(|s| {
            for t in 0..8 {
                let reg = &reg;
                let key = key.clone();
                s.spawn(move || {
                    for i in 0..50 {
                        let (h, _) = reg.get_or_create(&key, false).unwrap();
                        let data = frames(&format!("t{}-{}", t, i), 4);
                        reg.append(&h, &data, 4).unwrap();
                    }
                });
            }
        });
        assert_eq!(reg.len(), 1);
        let report = reg.close_all();
        assert_eq!(report.records(), 8 * 50 * 4);

        let got = read_frames(&dir.path().join("busy/TCP.ncap.gz"));
        assert_eq!(got.len(), 8 * 50 * 4);
        // each batch's four frames stay adjacent
        for chunk in got.chunks(4) {
            let stem = chunk[0].rsplit_once('-').unwrap().0;
            for (j, f) in chunk.iter().enumerate() {
                assert_eq!(f, &format!("{}-{}", stem, j));
            }
        }
    }

    #[test]
    fn first_sight_creates_exactly_once() {
        let dir = tempdir().unwrap();
        let reg = registry(dir.path());
        let barrier = Barrier::new(8);

        let created: usize = thread::scope(|s| {
            let workers: Vec<_> = (0..8)
                .map(|t| {
                    let (reg, barrier) = (&reg, &barrier);
                    s.spawn(move || {
                        barrier.wait();
                        let shared = StreamKey::new("shared", RecordType::TCP);
                        let own = StreamKey::new(format!("own-{}", t), RecordType::UDP);
                        let (_, a) = reg.get_or_create(&shared, false).unwrap();
                        let (_, b) = reg.get_or_create(&own, false).unwrap();
                        assert!(b);
                        usize::from(a)
                    })
                })
                .collect();
            workers.into_iter().map(|w| w.join().unwrap()).sum()
        });
        assert_eq!(created, 1);
        assert_eq!(reg.len(), 9);

        let failed = StreamKey::new("../escape", RecordType::TCP);
        assert!(reg.get_or_create(&failed, false).is_err());
        assert_eq!(reg.len(), 9);
        assert!(!reg.keys().contains(&failed));
        assert!(reg.close_all().is_ok());
    }

    #[test]
    fn flush_all_exposes_records_before_close() {
        let dir = tempdir().unwrap();
        let reg = HandleRegistry::new(HandleOptions {
            out_dir: dir.path().to_path_buf(),
            buffer: true,
            compress: false,
            buffer_size: 1 << 16,
        });
        let key = StreamKey::new("sensor-f", RecordType::HTTP);
        let (h, _) = reg.get_or_create(&key, false).unwrap();
        reg.append(&h, &frames("f", 3), 3).unwrap();
        assert_eq!(reg.keys(), vec![key.clone()]);

        let path = dir.path().join("sensor-f/HTTP.ncap");
        assert!(reg.flush_all().is_empty());
        assert_eq!(read_frames(&path), vec!["f-0", "f-1", "f-2"]);

        let report = reg.close_all();
        assert_eq!(report.records(), 3);
        assert!(reg.is_empty());
    }

    #[test]
    fn client_ids_cannot_escape_out_dir() {
        for bad in ["", ".", "..", "a/b", "..\\x", "nul\0", "tab\t"] {
            assert!(validate_client_id(bad).is_err(), "{:?}", bad);
        }
        for good in ["sensor-1", "host.example.com", "ÄÖÜ"] {
            assert!(validate_client_id(good).is_ok(), "{:?}", good);
        }
        assert!(validate_client_id(&"a".repeat(255)).is_ok());
        assert!(validate_client_id(&"a".repeat(256)).is_err());

        let dir = tempdir().unwrap();
        let reg = registry(dir.path());
        let key = StreamKey::new("../escape", RecordType::TCP);
        assert!(matches!(reg.get_or_create(&key, false), Err(LifecycleError::InvalidClientId(_))));
    }

    #[test]
    fn meta_types_never_get_containers() {
        let dir = tempdir().unwrap();
        let reg = registry(dir.path());
        let key = StreamKey::new("s", RecordType::Batch);
        assert!(matches!(reg.get_or_create(&key, false), Err(LifecycleError::MetaRecordType(_))));
    }
}
