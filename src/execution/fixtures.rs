//! Canned server documents shared by the execution tests.

pub const EXCEPTION_REPORT: &str = r#"<?xml version="1.0" encoding="UTF-8"?>
<ows:ExceptionReport xmlns:ows="http://www.opengis.net/ows/1.1" version="1.0.0">
    <ows:Exception exceptionCode="MissingParameterValue" locator="DELIMITER">
        <ows:ExceptionText>Input DELIMITER is required</ows:ExceptionText>
    </ows:Exception>
    <ows:Exception exceptionCode="NoApplicableCode"/>
</ows:ExceptionReport>"#;

pub const ACCEPTED: &str = r#"<?xml version="1.0" encoding="UTF-8"?>
<ns:ExecuteResponse xmlns:ns="http://www.opengis.net/wps/1.0.0"
    xmlns:ns1="http://www.opengis.net/ows/1.1"
    serviceInstance="http://host/wps/WebProcessingService?REQUEST=GetCapabilities&amp;SERVICE=WPS"
    statusLocation="http://host/wps/RetrieveResultServlet?id=6f9c">
    <ns:Process ns:processVersion="1.0.0">
        <ns1:Identifier>FeatureWeightedGridStatisticsAlgorithm</ns1:Identifier>
    </ns:Process>
    <ns:Status creationTime="2011-10-13T14:16:20.000-05:00">
        <ns:ProcessAccepted>Process Accepted</ns:ProcessAccepted>
    </ns:Status>
</ns:ExecuteResponse>"#;

pub const STARTED: &str = r#"<?xml version="1.0" encoding="UTF-8"?>
<wps:ExecuteResponse xmlns:wps="http://www.opengis.net/wps/1.0.0"
    xmlns:ows="http://www.opengis.net/ows/1.1">
    <wps:Status creationTime="2011-10-13T14:16:21.000-05:00">
        <wps:ProcessStarted percentCompleted="40">Computing statistics</wps:ProcessStarted>
    </wps:Status>
</wps:ExecuteResponse>"#;

pub const SUCCEEDED: &str = r#"<?xml version="1.0" encoding="UTF-8"?>
<ns:ExecuteResponse xmlns:ns="http://www.opengis.net/wps/1.0.0"
    xmlns:ns1="http://www.opengis.net/ows/1.1"
    serviceInstance="http://host/wps/WebProcessingService?REQUEST=GetCapabilities&amp;SERVICE=WPS"
    statusLocation="http://host/wps/RetrieveResultServlet?id=6f9c">
    <ns:Process ns:processVersion="1.0.0">
        <ns1:Identifier>FeatureWeightedGridStatisticsAlgorithm</ns1:Identifier>
        <ns1:Title>Feature Weighted Grid Statistics</ns1:Title>
    </ns:Process>
    <ns:Status creationTime="2011-10-13T14:16:22.622-05:00">
        <ns:ProcessSucceeded>Process successful</ns:ProcessSucceeded>
    </ns:Status>
    <ns:DataInputs>
        <ns:Input>
            <ns1:Identifier>DATASET_URI</ns1:Identifier>
            <ns:Data>
                <ns:LiteralData>dods://host/thredds/dodsC/gmo/GMO_w_meta.ncml</ns:LiteralData>
            </ns:Data>
        </ns:Input>
    </ns:DataInputs>
    <ns:ProcessOutputs>
        <ns:Output>
            <ns1:Identifier>OUTPUT</ns1:Identifier>
            <ns1:Title>Output File</ns1:Title>
            <ns:Reference encoding="UTF-8" mimeType="text/csv"
                href="http://host/wps/RetrieveResultServlet?id=1318528582026OUTPUT"/>
        </ns:Output>
        <ns:Output>
            <ns1:Identifier>POLYGON</ns1:Identifier>
            <ns:Data>
                <ns:ComplexData mimeType="text/plain">
                    7504912.93758151 -764109.175074507
                </ns:ComplexData>
            </ns:Data>
        </ns:Output>
    </ns:ProcessOutputs>
</ns:ExecuteResponse>"#;

pub const FAILED: &str = r#"<?xml version="1.0" encoding="UTF-8"?>
<wps:ExecuteResponse xmlns:wps="http://www.opengis.net/wps/1.0.0"
    xmlns:ows="http://www.opengis.net/ows/1.1">
    <wps:Status creationTime="2011-10-13T14:16:25.000-05:00">
        <wps:ProcessFailed>
            <ows:ExceptionReport version="1.0.0">
                <ows:Exception exceptionCode="NoApplicableCode">
                    <ows:ExceptionText>Dataset unreachable</ows:ExceptionText>
                </ows:Exception>
            </ows:ExceptionReport>
        </wps:ProcessFailed>
    </wps:Status>
</wps:ExecuteResponse>"#;
