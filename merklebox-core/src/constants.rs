/// Length in bytes of every digest in the system (SHA-256).
pub const HASH_LEN: usize = 32;

/// RSA modulus size for the server signing key.
pub const RSA_KEY_BITS: usize = 2048;

/// Bytes of the public key SHA-256 shown as a fingerprint.
pub const FINGERPRINT_LEN: usize = 8;

/// Route returning the folder snapshot and the server public key.
pub const ROUTE_FOLDER_LIST: &str = "/getfilelist";
/// Route returning the file list and signed Merkle root of one folder.
pub const ROUTE_FOLDER_MANIFEST: &str = "/getfile";
/// Query parameter naming the folder on [`ROUTE_FOLDER_MANIFEST`].
pub const QUERY_FOLDER: &str = "file";
/// Path segment under which raw folder files are served.
pub const STATIC_SEGMENT: &str = "MerkleFiles";

/// Default server port.
pub const DEFAULT_PORT: u16 = 8100;
/// Default directory whose subfolders are published.
pub const DEFAULT_DIRECTORY: &str = "./MerkleFiles";
/// Default client download root.
pub const DEFAULT_DOWNLOAD_DIR: &str = "DownloadFiles";
/// Server the client talks to when none is given.
pub const DEFAULT_SERVER_URL: &str = "http://localhost:8100";
