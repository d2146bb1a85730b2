use futures::FutureExt;

/// Destination store for ingested replay artifacts. Rows in `files` keep the
/// path returned by `store`.
pub trait RecStorage: Send + Sync {
    fn duplicate(&self) -> Box<dyn RecStorage>;

    fn store<'f, 'own>(
        &'own self,
        match_id: i32,
        filename: String,
        data: Vec<u8>,
    ) -> futures::future::BoxFuture<'f, Result<String, String>>
    where
        'own: 'f;

    fn list<'f, 'own>(&'own self) -> futures::future::BoxFuture<'f, Result<Vec<String>, String>>
    where
        'own: 'f;

    fn remove<'f, 'own>(
        &'own self,
        path: String,
    ) -> futures::future::BoxFuture<'f, Result<(), String>>
    where
        'own: 'f;
}

pub struct FileStorage {
    folder: std::sync::Arc<std::path::PathBuf>,
}

impl FileStorage {
    pub fn new<P>(folder: P) -> Self
    where
        P: Into<std::path::PathBuf>,
    {
        Self {
            folder: std::sync::Arc::new(folder.into()),
        }
    }
}

impl RecStorage for FileStorage {
    fn duplicate(&self) -> Box<dyn RecStorage> {
        Box::new(Self {
            folder: self.folder.clone(),
        })
    }

    fn store<'f, 'own>(
        &'own self,
        match_id: i32,
        filename: String,
        data: Vec<u8>,
    ) -> futures::future::BoxFuture<'f, Result<String, String>>
    where
        'own: 'f,
    {
        let folder = self.folder.clone();

        async move {
            let match_folder = folder.join(format!("{}/", match_id));
            if !tokio::fs::try_exists(&match_folder).await.unwrap_or(false) {
                tokio::fs::create_dir_all(&match_folder)
                    .await
                    .map_err(|e| e.to_string())?;
            }

            let rec_path = match_folder.join(&filename);
            tokio::fs::write(&rec_path, &data)
                .await
                .map_err(|e| e.to_string())?;

            Ok(format!("{}/{}", match_id, filename))
        }
        .boxed()
    }

    fn list<'f, 'own>(&'own self) -> futures::future::BoxFuture<'f, Result<Vec<String>, String>>
    where
        'own: 'f,
    {
        async move {
            let mut found = Vec::new();

            let mut folders = tokio::fs::read_dir(self.folder.as_path())
                .await
                .map_err(|e| e.to_string())?;
            while let Some(folder) = folders.next_entry().await.map_err(|e| e.to_string())? {
                if !folder.file_type().await.map(|t| t.is_dir()).unwrap_or(false) {
                    continue;
                }

                let match_part = folder.file_name().to_string_lossy().into_owned();
                let mut entries = tokio::fs::read_dir(folder.path())
                    .await
                    .map_err(|e| e.to_string())?;
                while let Some(entry) = entries.next_entry().await.map_err(|e| e.to_string())? {
                    found.push(format!(
                        "{}/{}",
                        match_part,
                        entry.file_name().to_string_lossy()
                    ));
                }
            }

            Ok(found)
        }
        .boxed()
    }

    fn remove<'f, 'own>(
        &'own self,
        path: String,
    ) -> futures::future::BoxFuture<'f, Result<(), String>>
    where
        'own: 'f,
    {
        async move {
            tokio::fs::remove_file(self.folder.join(&path))
                .await
                .map_err(|e| e.to_string())
        }
        .boxed()
    }
}

pub struct S3Storage {
    bucket: std::sync::Arc<s3::Bucket>,
}

impl S3Storage {
    pub fn new(
        bucket_name: &str,
        region: s3::region::Region,
        credentials: s3::creds::Credentials,
    ) -> Result<Self, s3::error::S3Error> {
        let mut bucket = s3::bucket::Bucket::new(bucket_name, region, credentials)?;
        bucket.set_path_style();

        Ok(Self {
            bucket: bucket.into(),
        })
    }
}

impl RecStorage for S3Storage {
    fn duplicate(&self) -> Box<dyn RecStorage> {
        Box::new(Self {
            bucket: self.bucket.clone(),
        })
    }

    fn store<'f, 'own>(
        &'own self,
        match_id: i32,
        filename: String,
        data: Vec<u8>,
    ) -> futures::future::BoxFuture<'f, Result<String, String>>
    where
        'own: 'f,
    {
        async move {
            let path = format!("{}/{}", match_id, filename);

            self.bucket
                .put_object(&path, &data)
                .await
                .map_err(|e| format!("Uploading rec to bucket: {:?}", e))?;

            Ok(path)
        }
        .boxed()
    }

    fn list<'f, 'own>(&'own self) -> futures::future::BoxFuture<'f, Result<Vec<String>, String>>
    where
        'own: 'f,
    {
        async move {
            let pages = self
                .bucket
                .list(String::new(), None)
                .await
                .map_err(|e| format!("Listing bucket: {:?}", e))?;

            Ok(pages
                .into_iter()
                .flat_map(|page| page.contents.into_iter().map(|obj| obj.key))
                .collect())
        }
        .boxed()
    }

    fn remove<'f, 'own>(
        &'own self,
        path: String,
    ) -> futures::future::BoxFuture<'f, Result<(), String>>
    where
        'own: 'f,
    {
        async move {
            self.bucket
                .delete_object(&path)
                .await
                .map_err(|e| format!("Deleting from bucket: {:?}", e))?;

            Ok(())
        }
        .boxed()
    }
}
