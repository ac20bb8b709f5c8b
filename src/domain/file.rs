use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
pub struct LocalFile {
    pub is_downloading_active: bool,
    pub is_downloading_completed: bool,
    pub downloaded_size: i64,
    pub path: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
pub struct RemoteFile {
    pub is_uploading_active: bool,
    pub uploaded_size: i64,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct File {
    pub id: i32,
    pub size: i64,
    pub local: LocalFile,
    pub remote: RemoteFile,
}

impl File {
    pub fn is_downloaded(&self) -> bool {
        self.local.is_downloading_completed
    }

    /// A transfer in either direction is in flight.
    pub fn is_transfer_active(&self) -> bool {
        self.local.is_downloading_active || self.remote.is_uploading_active
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn file() -> File {
        File {
            id: 1,
            size: 2048,
            local: LocalFile::default(),
            remote: RemoteFile::default(),
        }
    }

    #[test]
    fn fresh_file_has_no_active_transfer() {
        assert!(!file().is_transfer_active());
        assert!(!file().is_downloaded());
    }

    #[test]
    fn download_in_flight_is_an_active_transfer() {
        let mut file = file();
        file.local.is_downloading_active = true;

        assert!(file.is_transfer_active());
    }

    #[test]
    fn upload_in_flight_is_an_active_transfer() {
        let mut file = file();
        file.remote.is_uploading_active = true;

        assert!(file.is_transfer_active());
    }
}
