fn main() {
    println!("Run `cargo test -p transfer-compat` to execute transfer compatibility tests.");
}

#[cfg(test)]
mod tests {
    use std::fs;
    use std::path::{Path, PathBuf};

    use fsguard_transfer::{
        ErrorKind, HashAlgorithm, Operation, TransferOptions, TransferRecord,
        digest_bytes, read_file, read_file_to, write_file, write_file_from,
    };

    const HELLO_SHA256: &str = "2cf24dba5fb0a30e26e83b2ac5b9e29e1b161e5c1fa7425e73043362938b9824";

    /// Returns the path to the fixtures directory.
    fn fixtures_dir() -> PathBuf {
        PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("fixtures")
    }

    /// Loads a fixture JSON file and returns it as a `serde_json::Value`.
    fn load_fixture(name: &str) -> serde_json::Value {
        let path = fixtures_dir().join(name);
        let data = fs::read_to_string(&path)
            .unwrap_or_else(|e| panic!("failed to read fixture {}: {e}", path.display()));
        serde_json::from_str(&data)
            .unwrap_or_else(|e| panic!("failed to parse fixture {}: {e}", path.display()))
    }

    /// Deserializes a fixture, re-serializes it, and compares the JSON values.
    fn roundtrip_test<T>(name: &str) -> T
    where
        T: serde::de::DeserializeOwned + serde::Serialize,
    {
        let fixture = load_fixture(name);
        let parsed: T = serde_json::from_value(fixture.clone())
            .unwrap_or_else(|e| panic!("failed to deserialize {name}: {e}"));
        let reserialized = serde_json::to_value(&parsed)
            .unwrap_or_else(|e| panic!("failed to re-serialize {name}: {e}"));
        assert_eq!(
            fixture, reserialized,
            "roundtrip mismatch for {name}:\n  fixture: {fixture}\n  ours:    {reserialized}"
        );
        parsed
    }

    fn pattern(len: usize) -> Vec<u8> {
        (0..len).map(|i| (i * 31 % 251) as u8).collect()
    }

    // --- Document formats ---

    #[test]
    fn fixture_write_record() {
        let record: TransferRecord = roundtrip_test("write_record.json");
        assert_eq!(record.operation(), Operation::Write);
        assert_eq!(record.content_hash(), Some(HELLO_SHA256));
    }

    #[test]
    fn fixture_read_record() {
        let record: TransferRecord = roundtrip_test("read_record.json");
        assert_eq!(record.operation(), Operation::Read);
        assert_eq!(record.content_hash_algorithm(), None);
    }

    #[test]
    fn fixture_write_options() {
        let opts: TransferOptions = roundtrip_test("write_options.json");
        assert_eq!(opts.mode, Some(0o600));
        assert!(opts.unlink_on_error);
    }

    #[test]
    fn fixture_read_options() {
        let opts: TransferOptions = roundtrip_test("read_options.json");
        assert_eq!(opts.chunk_size, Some(4096));
        assert_eq!(opts.text_encoding.as_deref(), Some("utf8"));
    }

    // --- End-to-end transfers ---

    #[tokio::test]
    async fn written_record_matches_fixture() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("hello.txt");
        let opts = TransferOptions::from_json(
            &load_fixture("write_options.json").to_string(),
        )
        .unwrap();

        let record = write_file(&path, "hello", &opts).await.unwrap();
        let mut expected = load_fixture("write_record.json");
        expected["path"] = serde_json::json!(path);
        assert_eq!(serde_json::to_value(&record).unwrap(), expected);
    }

    #[tokio::test]
    async fn write_then_read_roundtrip() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("roundtrip.bin");
        let data = pattern(300_000);

        let written = write_file(&path, &data, &TransferOptions::default())
            .await
            .unwrap();
        let read = read_file(&path, &TransferOptions::default()).await.unwrap();

        assert_eq!(written.size(), read.record.size());
        assert_eq!(read.content.into_bytes(), data);
    }

    #[tokio::test]
    async fn text_roundtrip() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("note.txt");

        write_file(&path, "grüße", &TransferOptions::default())
            .await
            .unwrap();
        let out = read_file(&path, &TransferOptions::new().with_text_encoding("utf8"))
            .await
            .unwrap();
        assert_eq!(out.content.as_text(), Some("grüße"));
        assert_eq!(out.record.size(), "grüße".len() as u64);
    }

    #[tokio::test]
    async fn static_size_mismatch_leaves_no_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("short.bin");

        let opts = TransferOptions::new()
            .with_exact_size(10)
            .with_unlink_on_error(true);
        let err = write_file(&path, b"0123456789A", &opts).await.unwrap_err();
        assert_eq!(err.kind(), ErrorKind::SizeMismatch);
        assert!(!path.exists());
    }

    #[tokio::test]
    async fn oversized_read_fails() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("big.bin");
        fs::write(&path, pattern(200_000)).unwrap();

        let err = read_file(&path, &TransferOptions::new().with_max_size(100_000))
            .await
            .unwrap_err();
        assert_eq!(err.kind(), ErrorKind::SizeLimitExceeded);

        // The handle was released: the file can be removed and recreated.
        fs::remove_file(&path).unwrap();
        fs::write(&path, b"x").unwrap();
    }

    #[tokio::test]
    async fn buffered_and_streamed_hashes_agree() {
        let dir = tempfile::tempdir().unwrap();
        let data = pattern(150_000);
        let opts = TransferOptions::new().with_hash("sha512");

        let buffered = write_file(dir.path().join("a.bin"), &data, &opts)
            .await
            .unwrap();
        let mut source: &[u8] = &data;
        let streamed = write_file_from(dir.path().join("b.bin"), &mut source, &opts)
            .await
            .unwrap();

        let mut sink = Vec::new();
        let piped = read_file_to(dir.path().join("b.bin"), &mut sink, &opts)
            .await
            .unwrap();

        let expected = digest_bytes(HashAlgorithm::Sha512, &data);
        assert_eq!(expected.len(), HashAlgorithm::Sha512.hex_len());
        assert_eq!(buffered.content_hash(), Some(expected.as_str()));
        assert_eq!(streamed.content_hash(), Some(expected.as_str()));
        assert_eq!(piped.content_hash(), Some(expected.as_str()));
        assert_eq!(sink, data);
    }

    #[tokio::test]
    async fn streamed_hash_mismatch_unlinks() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("tampered.bin");

        let mut source: &[u8] = b"hello!";
        let opts = TransferOptions::new()
            .with_hash("sha256")
            .with_expected_hash(HELLO_SHA256)
            .with_unlink_on_error(true);
        let err = write_file_from(&path, &mut source, &opts)
            .await
            .unwrap_err();
        assert_eq!(err.kind(), ErrorKind::ContentHashMismatch);
        assert!(!path.exists());
    }

    #[tokio::test]
    async fn missing_file_is_open_failure() {
        let dir = tempfile::tempdir().unwrap();
        let err = read_file(dir.path().join("missing.txt"), &TransferOptions::default())
            .await
            .unwrap_err();
        assert_eq!(err.kind(), ErrorKind::OpenFailed);
        assert!(err.to_string().contains("missing.txt"));
    }

    #[tokio::test]
    async fn record_path_is_caller_path() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("p.txt");
        let record = write_file(&path, 7u8, &TransferOptions::default())
            .await
            .unwrap();
        assert_eq!(record.path(), Path::new(&path));
        assert_eq!(fs::read_to_string(&path).unwrap(), "7");
    }
}
