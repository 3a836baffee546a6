//! Request URL builders for the RCSB REST endpoints

use crate::error::Result;
use url::Url;

fn join_ids<S: AsRef<str>>(items: &[S]) -> String {
    items.iter().map(AsRef::as_ref).collect::<Vec<_>>().join(",")
}

/// Custom report: `?pdbids=..&customReportColumns=..&format=csv&service=wsfile`
pub fn report_url<I: AsRef<str>, F: AsRef<str>>(base: &str, ids: &[I], fields: &[F]) -> Result<Url> {
    let mut url = Url::parse(base)?;
    url.query_pairs_mut()
        .append_pair("pdbids", &join_ids(ids))
        .append_pair("customReportColumns", &join_ids(fields))
        .append_pair("format", "csv")
        .append_pair("service", "wsfile");
    Ok(url)
}

/// describeMol: `?structureId=..&format=csv&service=wsfile` (the body is XML regardless)
pub fn describe_url<I: AsRef<str>>(base: &str, ids: &[I]) -> Result<Url> {
    let mut url = Url::parse(base)?;
    url.query_pairs_mut()
        .append_pair("structureId", &join_ids(ids))
        .append_pair("format", "csv")
        .append_pair("service", "wsfile");
    Ok(url)
}

/// FASTA download: `?structureIdList=..&compressionType=uncompressed`
pub fn fasta_url(base: &str, id: &str) -> Result<Url> {
    let mut url = Url::parse(base)?;
    url.query_pairs_mut()
        .append_pair("structureIdList", id)
        .append_pair("compressionType", "uncompressed");
    Ok(url)
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use super::*;

    fn pairs(url: &Url) -> Vec<(String, String)> {
        url.query_pairs().map(|(k, v)| (k.into_owned(), v.into_owned())).collect()
    }

    #[test]
    fn test_report_url() {
        let url = report_url(
            "http://www.rcsb.org/pdb/rest/customReport.xml",
            &["5JUP", "5JUU"],
            &["structureId", "resolution"],
        )
        .unwrap();

        assert_eq!(url.path(), "/pdb/rest/customReport.xml");
        assert_eq!(
            pairs(&url),
            vec![
                ("pdbids".into(), "5JUP,5JUU".into()),
                ("customReportColumns".into(), "structureId,resolution".into()),
                ("format".into(), "csv".into()),
                ("service".into(), "wsfile".into()),
            ]
        );
    }

    #[test]
    fn test_describe_url() {
        let url = describe_url("https://www.rcsb.org/pdb/rest/describeMol", &["4HHB"]).unwrap();
        assert_eq!(
            pairs(&url),
            vec![
                ("structureId".into(), "4HHB".into()),
                ("format".into(), "csv".into()),
                ("service".into(), "wsfile".into()),
            ]
        );
    }

    #[test]
    fn test_fasta_url() {
        let url = fasta_url("https://www.rcsb.org/pdb/download/downloadFastaFiles.do", "5JUP").unwrap();
        assert_eq!(
            url.as_str(),
            "https://www.rcsb.org/pdb/download/downloadFastaFiles.do?structureIdList=5JUP&compressionType=uncompressed"
        );
    }

    #[test]
    fn test_bad_base_url() {
        assert!(fasta_url("not a url", "5JUP").is_err());
    }
}
