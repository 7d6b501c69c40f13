//! `<input type="file">` で選ばれたファイル

use async_trait::async_trait;
use facescan_common::{DataUrl, Error, PickedFile, Result};

pub struct BrowserFile {
    file: gloo::file::File,
}

impl BrowserFile {
    pub fn new(file: web_sys::File) -> Self {
        Self { file: file.into() }
    }
}

#[async_trait(?Send)]
impl PickedFile for BrowserFile {
    fn name(&self) -> String {
        self.file.name()
    }

    fn mime_type(&self) -> String {
        self.file.raw_mime_type()
    }

    async fn read_data_url(&self) -> Result<DataUrl> {
        let url = gloo::file::futures::read_as_data_url(&self.file)
            .await
            .map_err(|e| Error::FileRead(format!("{}: {}", self.file.name(), e)))?;
        DataUrl::parse(url)
    }
}
