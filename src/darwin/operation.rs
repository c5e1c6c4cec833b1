use std::fmt;

/// Darwin LDB operations exposed by the gateway.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum OperationId {
    ArrivalBoard,
    DepartureBoard,
    DetailedArrivalBoard,
    DetailedDepartureBoard,
    CombinedBoard,
    DetailedCombinedBoard,
    ServiceDetails,
    NextDepartures,
    DetailedNextDepartures,
}

/// Request and response shape shared by a family of operations.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OperationKind {
    /// Station board: `GetStationBoardResult` with train/bus/ferry services.
    Board,
    /// A single service record keyed by service id.
    ServiceDetails,
    /// `DeparturesBoard` grouped by destination.
    NextDepartures,
}

/// One row of the operation table.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct OperationSpec {
    pub id: OperationId,
    pub kind: OperationKind,
    /// Element wrapping the request parameters in the SOAP body.
    pub request_element: &'static str,
    /// Element wrapping the result in the SOAP response body.
    pub response_element: &'static str,
    /// Result container inside the response element.
    pub result_key: &'static str,
}

const STATION_BOARD_RESULT: &str = "GetStationBoardResult";

// Indexed by `OperationId as usize`; keep in declaration order.
static OPERATIONS: [OperationSpec; 9] = [
    OperationSpec {
        id: OperationId::ArrivalBoard,
        kind: OperationKind::Board,
        request_element: "GetArrivalBoardRequest",
        response_element: "GetArrivalBoardResponse",
        result_key: STATION_BOARD_RESULT,
    },
    OperationSpec {
        id: OperationId::DepartureBoard,
        kind: OperationKind::Board,
        request_element: "GetDepartureBoardRequest",
        response_element: "GetDepartureBoardResponse",
        result_key: STATION_BOARD_RESULT,
    },
    OperationSpec {
        id: OperationId::DetailedArrivalBoard,
        kind: OperationKind::Board,
        request_element: "GetArrBoardWithDetailsRequest",
        response_element: "GetArrBoardWithDetailsResponse",
        result_key: STATION_BOARD_RESULT,
    },
    OperationSpec {
        id: OperationId::DetailedDepartureBoard,
        kind: OperationKind::Board,
        request_element: "GetDepBoardWithDetailsRequest",
        response_element: "GetDepBoardWithDetailsResponse",
        result_key: STATION_BOARD_RESULT,
    },
    OperationSpec {
        id: OperationId::CombinedBoard,
        kind: OperationKind::Board,
        request_element: "GetArrivalDepartureBoardRequest",
        response_element: "GetArrivalDepartureBoardResponse",
        result_key: STATION_BOARD_RESULT,
    },
    OperationSpec {
        id: OperationId::DetailedCombinedBoard,
        kind: OperationKind::Board,
        request_element: "GetArrDepBoardWithDetailsRequest",
        response_element: "GetArrDepBoardWithDetailsResponse",
        result_key: STATION_BOARD_RESULT,
    },
    OperationSpec {
        id: OperationId::ServiceDetails,
        kind: OperationKind::ServiceDetails,
        request_element: "GetServiceDetailsRequest",
        response_element: "GetServiceDetailsResponse",
        result_key: "GetServiceDetailsResult",
    },
    OperationSpec {
        id: OperationId::NextDepartures,
        kind: OperationKind::NextDepartures,
        request_element: "GetNextDeparturesRequest",
        response_element: "GetNextDeparturesResponse",
        result_key: "DeparturesBoard",
    },
    OperationSpec {
        id: OperationId::DetailedNextDepartures,
        kind: OperationKind::NextDepartures,
        request_element: "GetNextDeparturesWithDetailsRequest",
        response_element: "GetNextDeparturesWithDetailsResponse",
        result_key: "DeparturesBoard",
    },
];

impl OperationId {
    pub const ALL: [OperationId; 9] = [
        OperationId::ArrivalBoard,
        OperationId::DepartureBoard,
        OperationId::DetailedArrivalBoard,
        OperationId::DetailedDepartureBoard,
        OperationId::CombinedBoard,
        OperationId::DetailedCombinedBoard,
        OperationId::ServiceDetails,
        OperationId::NextDepartures,
        OperationId::DetailedNextDepartures,
    ];

    pub fn spec(self) -> &'static OperationSpec {
        &OPERATIONS[self as usize]
    }

    pub fn kind(self) -> OperationKind {
        self.spec().kind
    }
}

impl fmt::Display for OperationId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.spec().request_element.trim_end_matches("Request"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_table_rows_match_their_ids() {
        for id in OperationId::ALL {
            assert_eq!(id.spec().id, id);
        }
    }

    #[test]
    fn test_element_names_follow_darwin_convention() {
        for id in OperationId::ALL {
            let spec = id.spec();
            let stem = spec.request_element.trim_end_matches("Request");
            assert_eq!(spec.response_element, format!("{}Response", stem));
        }
    }

    #[test]
    fn test_result_keys() {
        assert_eq!(OperationId::DetailedCombinedBoard.spec().result_key, "GetStationBoardResult");
        assert_eq!(OperationId::ServiceDetails.spec().result_key, "GetServiceDetailsResult");
        assert_eq!(OperationId::DetailedNextDepartures.spec().result_key, "DeparturesBoard");
        assert_eq!(OperationId::NextDepartures.kind(), OperationKind::NextDepartures);
    }

    #[test]
    fn test_display() {
        assert_eq!(OperationId::DetailedArrivalBoard.to_string(), "GetArrBoardWithDetails");
    }
}
